//! Last-update badge files for dashboards that watch the collector.

use std::{fs, path::Path};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// What the badge files record about the most recent run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdate {
    pub updated_utc: String,
    pub updated_local: String,
    pub tz_local: String,
    pub rows_last_run: usize,
}

impl LastUpdate {
    /// Captures the current wall clock.
    pub fn now(tz: Tz, rows_last_run: usize) -> Self {
        Self::at(Utc::now(), tz, rows_last_run)
    }

    fn at(instant: DateTime<Utc>, tz: Tz, rows_last_run: usize) -> Self {
        LastUpdate {
            updated_utc: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_local: instant
                .with_timezone(&tz)
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            tz_local: tz.name().to_string(),
            rows_last_run,
        }
    }
}

/// Writes `last_update.json` and `last_update.csv` under `dir`.
pub fn write_status(dir: &Path, update: &LastUpdate) -> Result<()> {
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(update)?;
    fs::write(dir.join("last_update.json"), json + "\n")?;

    let csv = format!(
        "updated_local,updated_utc,tz_local,rows_last_run\n{},{},{},{}\n",
        update.updated_local, update.updated_utc, update.tz_local, update.rows_last_run
    );
    fs::write(dir.join("last_update.csv"), csv)?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
