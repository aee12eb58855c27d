use crate::batch::JobBatch;
use crate::config::InputConfig;
use crate::SweepError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads the URL list named by the `[input]` config section
///
/// # Returns
///
/// * `Ok(JobBatch)` - URLs in file order, header skipped if configured
/// * `Err(SweepError::Input)` - The file could not be opened or parsed
pub fn read_url_list(config: &InputConfig) -> Result<JobBatch, SweepError> {
    let path = Path::new(&config.path);
    let input_error = |message: String| SweepError::Input {
        path: path.display().to_string(),
        message,
    };

    let separator = config
        .separator
        .bytes()
        .next()
        .ok_or_else(|| input_error("separator is empty".to_string()))?;

    let file = File::open(path).map_err(|e| input_error(e.to_string()))?;
    let batch =
        read_urls_from(file, separator, config.skip_header).map_err(|e| input_error(e.to_string()))?;

    tracing::info!("Read {} URLs from {}", batch.len(), path.display());
    Ok(batch)
}

/// Reads URLs from any delimited source
///
/// The URL is the first field of every record, trimmed. Records whose first
/// field is empty are dropped. Records may have differing field counts.
pub fn read_urls_from<R: Read>(
    source: R,
    separator: u8,
    skip_header: bool,
) -> Result<JobBatch, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(skip_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(0) {
            Some(url) if !url.is_empty() => urls.push(url.to_string()),
            _ => tracing::trace!("Skipping record without URL at {:?}", record.position()),
        }
    }

    Ok(JobBatch::new(urls))
}
