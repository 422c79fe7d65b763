use std::io::Write;
use crate::error::Result;
use crate::types::AuthorStats;

pub fn write_csv<W: Write>(stats: &[AuthorStats], out: &mut W) -> Result<()> {
    writeln!(out, "Name,Lines,Commits,Files")?;
    for line in stats {
        writeln!(out, "{},{},{},{}", quote(&line.name), line.lines, line.commits, line.files)?;
    }
    Ok(())
}

/// Quotes a field when it holds a delimiter, quote, line break or leading space.
fn quote(field: &str) -> String {
    let needs = field.contains([',', '"', '\r', '\n'])
        || field.starts_with(|c: char| c == ' ' || c == '\t');
    if needs {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
