use comfy_table::{presets::NOTHING, CellAlignment, Table};
use std::io::Write;
use crate::error::Result;
use crate::types::AuthorStats;

/// Whitespace-aligned table, one author per row.
pub fn write_table<W: Write>(stats: &[AuthorStats], out: &mut W) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec!["Name", "Lines", "Commits", "Files"]);

    for s in stats {
        table.add_row(vec![
            s.name.clone(),
            s.lines.to_string(),
            s.commits.to_string(),
            s.files.to_string(),
        ]);
    }
    for idx in 1..=3 {
        if let Some(col) = table.column_mut(idx) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    writeln!(out, "{table}")?;
    Ok(())
}
