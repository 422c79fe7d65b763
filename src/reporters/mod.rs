pub mod csv;
pub mod json;
pub mod terminal;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::error::{Result, TallyError};
use crate::types::{AuthorStats, OutputFormat};

/// Writes already-ranked records in the chosen format. Never reorders.
pub fn render<W: Write>(format: OutputFormat, stats: &[AuthorStats], out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Tabular   => terminal::write_table(stats, out),
        OutputFormat::Csv       => csv::write_csv(stats, out),
        OutputFormat::Json      => json::write_json(stats, out),
        OutputFormat::JsonLines => json::write_json_lines(stats, out),
    }
}

/// Renders to `output_file` if given, otherwise stdout.
pub fn write_report(format: OutputFormat, stats: &[AuthorStats], output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let file = File::create(path).map_err(|e| {
            TallyError::Config(format!("Failed to open {} for writing: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        render(format, stats, &mut writer)?;
        writer.flush()?;
    } else {
        let stdout = std::io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        render(format, stats, &mut writer)?;
        writer.flush()?;
    }
    Ok(())
}
