//! CSV export for selected slots.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::slots::SelectedSlot;

/// Column header for CSV slot export.
const HEADER: &str = "valid_from,valid_to,minutes,intensity";

/// Exports selected slots to a CSV file at the given path.
///
/// Writes a header row followed by one row per slot in selection order
/// (ascending intensity). Timestamps are RFC 3339 UTC.
///
/// # Arguments
///
/// * `slots` - Selected slots
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(slots: &[SelectedSlot], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(slots, buf)
}

/// Writes selected slots as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(slots: &[SelectedSlot], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for s in slots {
        wtr.write_record(&[
            s.valid_from.to_rfc3339(),
            s.valid_to.to_rfc3339(),
            s.minutes().to_string(),
            s.intensity.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
