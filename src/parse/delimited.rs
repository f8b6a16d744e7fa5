//! Reads the provider's delimited-text export.

use tracing::debug;

use super::{Error, Table};

/// Delimiters the provider has used across export variants.
const DELIMITER_CANDIDATES: [u8; 3] = [b';', b',', b'\t'];

/// How much of the export the delimiter sniff inspects.
const SNIFF_WINDOW: usize = 4096;

/// Picks the candidate that appears on every sampled line, preferring the
/// one the header line uses most. Exports default to semicolons.
pub(crate) fn sniff_delimiter(text: &str) -> u8 {
    let mut window = SNIFF_WINDOW.min(text.len());
    while !text.is_char_boundary(window) {
        window -= 1;
    }
    let lines: Vec<&str> = text[..window]
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(10)
        .collect();
    if lines.is_empty() {
        return b';';
    }

    let mut best: Option<(usize, u8)> = None;
    for candidate in DELIMITER_CANDIDATES {
        if !lines.iter().all(|line| line.as_bytes().contains(&candidate)) {
            continue;
        }
        let header_count = lines[0].bytes().filter(|&byte| byte == candidate).count();
        if best.map_or(true, |(count, _)| header_count > count) {
            best = Some((header_count, candidate));
        }
    }

    best.map_or(b';', |(_, candidate)| candidate)
}

/// Reads the export into a header row and data rows.
pub(crate) fn read_table(text: &str) -> Result<Table, Error> {
    let delimiter = sniff_delimiter(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers = loop {
        match records.next() {
            Some(Ok(record)) => {
                let cells = to_cells(&record);
                if cells.iter().any(|cell| !cell.is_empty()) {
                    break cells;
                }
            }
            Some(Err(failure)) => debug!(%failure, "unreadable line before the header"),
            None => return Err(Error::NoHeaderRow),
        }
    };

    let mut rows = Vec::new();
    for record in records {
        match record {
            Ok(record) => rows.push(to_cells(&record)),
            Err(failure) => debug!(%failure, "skipping unreadable line"),
        }
    }
    if rows.is_empty() {
        return Err(Error::NoBodyRows);
    }

    Ok(Table { headers, rows })
}

fn to_cells(record: &csv::StringRecord) -> Vec<String> {
    record.iter().map(|cell| cell.trim().to_string()).collect()
}

// -- Tests -------------------------------------------------------------------
