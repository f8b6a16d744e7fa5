//! Extraction of hourly observations from the provider's two table shapes.
//!
//! The observation page embeds an HTML table; some layouts link a
//! delimited-text export instead. Both funnel into the same column
//! classification and value normalisation.

pub mod delimited;
pub mod headers;
pub mod html;
pub mod normalize;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

pub use headers::ColumnRoles;

/// One hour-aligned temperature reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub instant: DateTime<Utc>,
    pub temp_c: f64,
}

/// A table lifted out of a source document: one header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Why extraction could not produce observations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no observation table in the document")]
    NoTable,
    #[error("the observation table has no header row")]
    NoHeaderRow,
    #[error("the observation table has no data rows")]
    NoBodyRows,
    #[error("no date or time column among {headers:?}")]
    NoDateTimeColumn { headers: Vec<String> },
    #[error("no air temperature column among {headers:?}")]
    NoTemperatureColumn { headers: Vec<String> },
    #[error("no row carried both a readable timestamp and a temperature")]
    NoObservations,
}

/// Row-level accounting for one extraction run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub extracted: usize,
    pub skipped_short: usize,
    pub skipped_datetime: usize,
    pub skipped_temperature: usize,
}

/// Extracts observations from the scraped page.
///
/// Page tables must carry recognisable timestamp headers; the lenient
/// positional fallback applies to delimited exports only.
pub fn from_html(document: &str, tz: Tz) -> Result<(Vec<Observation>, ExtractStats), Error> {
    let table = html::read_table(document)?;
    from_table(&table, tz, false)
}

/// Extracts observations from a delimited-text export.
///
/// `lenient` lets rows carry the timestamp in their first two fields when
/// no date or time header is recognised.
pub fn from_delimited(
    text: &str,
    tz: Tz,
    lenient: bool,
) -> Result<(Vec<Observation>, ExtractStats), Error> {
    let table = delimited::read_table(text)?;
    from_table(&table, tz, lenient)
}

fn from_table(
    table: &Table,
    tz: Tz,
    lenient: bool,
) -> Result<(Vec<Observation>, ExtractStats), Error> {
    let roles = ColumnRoles::resolve(&table.headers, lenient)?;
    let mut stats = ExtractStats::default();
    let mut observations = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        if row.len() <= roles.max_index() {
            stats.skipped_short += 1;
            continue;
        }
        let Some(temp_c) = normalize::parse_temperature(&row[roles.temperature]) else {
            stats.skipped_temperature += 1;
            continue;
        };
        let instant = roles
            .raw_datetime(row)
            .and_then(|raw| normalize::parse_local_datetime(&raw))
            .and_then(|local| normalize::align_hour_utc(local, tz));
        let Some(instant) = instant else {
            stats.skipped_datetime += 1;
            continue;
        };

        observations.push(Observation { instant, temp_c });
        stats.extracted += 1;
    }

    Ok((observations, stats))
}

// -- Tests -------------------------------------------------------------------
