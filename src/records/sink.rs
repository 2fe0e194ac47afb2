use std::io::Write;
use std::path::Path;

use crate::error::{Context, Result};

use super::format::{Row, HEADER};

const DELIMITER: u8 = b';';

/// Write the header followed by every row.
pub fn write_rows<W: Write>(writer: W, rows: &[Row]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);

    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record(row.iter())?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_file(path: &Path, rows: &[Row]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    write_rows(file, rows)
}
