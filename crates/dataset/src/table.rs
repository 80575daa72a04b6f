use crate::error::{DatasetError, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;

/// One dataset record, column name to raw string value.
pub type RawRow = HashMap<String, String>;

/// Cap on the detected-column list embedded in schema errors, so a garbled
/// payload cannot produce an unbounded diagnostic.
const FOUND_COLUMNS_PREVIEW: usize = 30;

/// Parse a delimited payload into rows, verifying that `required` columns
/// are present in the header.
///
/// The portal publishes both `;`- and `,`-delimited files, so the header is
/// sniffed first: parsed with `;`, and re-parsed with `,` when the result is
/// a single field that still contains commas. A malformed record never
/// aborts the load; short rows read as empty fields and unreadable records
/// are skipped.
pub fn parse_rows(text: &str, required: &[&str]) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut delimiter = b';';
    let mut headers = read_headers(text, delimiter);
    if headers.len() == 1 && headers[0].contains(',') {
        delimiter = b',';
        headers = read_headers(text, delimiter);
    }
    check_required(&headers, required)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                log::debug!("skipping unreadable record: {err}");
                continue;
            }
        };

        let mut row = RawRow::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            row.insert(name.clone(), record.get(idx).unwrap_or("").to_string());
        }
        rows.push(row);
    }

    Ok(rows)
}

fn read_headers(text: &str, delimiter: u8) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    match reader.headers() {
        Ok(headers) => headers.iter().map(|h| h.trim().to_string()).collect(),
        Err(_) => Vec::new(),
    }
}

fn check_required(headers: &[String], required: &[&str]) -> Result<()> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|name| !headers.iter().any(|h| h == *name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();

    let mut found = headers.to_vec();
    found.sort();
    found.truncate(FOUND_COLUMNS_PREVIEW);

    Err(DatasetError::Schema { missing, found })
}
