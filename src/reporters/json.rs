use std::io::Write;
use crate::error::Result;
use crate::types::AuthorStats;

/// One JSON array holding every record.
pub fn write_json<W: Write>(stats: &[AuthorStats], out: &mut W) -> Result<()> {
    serde_json::to_writer(&mut *out, stats)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// One JSON object per line.
pub fn write_json_lines<W: Write>(stats: &[AuthorStats], out: &mut W) -> Result<()> {
    for line in stats {
        serde_json::to_writer(&mut *out, line)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
