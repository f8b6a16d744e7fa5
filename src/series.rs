//! The merged hourly series and the long-term archive, both plain CSV.
//!
//! Every run rewrites the whole file: rows live in a map keyed by UTC
//! instant, so reruns are idempotent and fresher readings win.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parse::Observation;

/// On-disk column order; mirrors the `SeriesRow` field order.
const COLUMNS: [&str; 5] = ["date_local", "time_local", "datetime_utc", "temp_c", "source"];

/// One persisted row. Field order is the column order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub date_local: String,
    pub time_local: String,
    pub datetime_utc: String,
    pub temp_c: String,
    pub source: String,
}

impl SeriesRow {
    /// Renders one observation into its persisted shape.
    pub fn project(instant: DateTime<Utc>, temp_c: f64, tz: Tz, source: &str) -> Self {
        let local = instant.with_timezone(&tz);
        SeriesRow {
            date_local: local.format("%Y-%m-%d").to_string(),
            time_local: local.format("%H:%M").to_string(),
            datetime_utc: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            temp_c: format!("{temp_c:.1}"),
            source: source.to_string(),
        }
    }

    /// Re-reads the instant and temperature this row encodes.
    fn reading(&self) -> Option<(DateTime<Utc>, f64)> {
        let instant = DateTime::parse_from_rfc3339(&self.datetime_utc)
            .ok()?
            .with_timezone(&Utc);
        let temp_c = self.temp_c.trim().parse().ok()?;
        Some((instant, temp_c))
    }
}

/// Merges freshly extracted observations into the existing series.
///
/// Existing rows load first, fresh ones overwrite on the same instant, and
/// the result comes back sorted and re-projected.
pub fn merge(existing: &[SeriesRow], fresh: &[Observation], tz: Tz, source: &str) -> Vec<SeriesRow> {
    let mut by_instant: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
    for row in existing {
        match row.reading() {
            Some((instant, temp_c)) => {
                by_instant.insert(instant, temp_c);
            }
            None => debug!(datetime = %row.datetime_utc, "dropping an unreadable series row"),
        }
    }
    for observation in fresh {
        by_instant.insert(observation.instant, observation.temp_c);
    }

    by_instant
        .into_iter()
        .map(|(instant, temp_c)| SeriesRow::project(instant, temp_c, tz, source))
        .collect()
}

/// Folds hourly rows into the archive.
///
/// Rows are kept verbatim and keyed by their UTC timestamp string, which
/// sorts chronologically on its own. Hourly rows win on collision.
pub fn merge_archive(existing: &[SeriesRow], hourly: &[SeriesRow]) -> Vec<SeriesRow> {
    let mut by_key: BTreeMap<String, SeriesRow> = BTreeMap::new();
    for row in existing.iter().chain(hourly) {
        by_key.insert(row.datetime_utc.clone(), row.clone());
    }
    by_key.into_values().collect()
}

/// Loads a series file; a missing file is an empty series.
pub fn read_series(path: &Path) -> Result<Vec<SeriesRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(failure) => debug!(%failure, "skipping an unreadable series row"),
        }
    }
    Ok(rows)
}

/// Rewrites a series file in full, creating parent directories as needed.
///
/// The header row is written even when there are no rows.
pub fn write_series(path: &Path, rows: &[SeriesRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

// -- Tests -------------------------------------------------------------------
