//! Delimited report output

use crate::report::aggregate::ReportRows;
use crate::SweepError;
use csv::Writer;
use std::io::Write;
use std::path::Path;

/// Writes the report to `path`, header row first when one is given
///
/// # Returns
///
/// * `Ok(usize)` - Number of result rows written (header not counted)
/// * `Err(SweepError::Output)` - The file could not be created or written
pub fn write_report(
    rows: &ReportRows,
    path: &Path,
    header: Option<&[String]>,
) -> Result<usize, SweepError> {
    let output_error = |message: String| SweepError::Output {
        path: path.display().to_string(),
        message,
    };

    let writer = Writer::from_path(path).map_err(|e| output_error(e.to_string()))?;
    let written = write_rows(writer, rows, header).map_err(|e| output_error(e.to_string()))?;

    tracing::info!("Wrote {} rows to {}", written, path.display());
    Ok(written)
}

/// Writes the report to any sink
pub fn write_rows<W: Write>(
    mut writer: Writer<W>,
    rows: &ReportRows,
    header: Option<&[String]>,
) -> Result<usize, csv::Error> {
    if let Some(header) = header.filter(|h| !h.is_empty()) {
        writer.write_record(header)?;
    }

    for (url, token) in rows.pairs() {
        writer.write_record([url, token])?;
    }

    writer.flush()?;
    Ok(rows.len())
}
