//! Run configuration and the station defaults baked into the collector.

use std::{path::PathBuf, time::Duration};

use chrono_tz::Tz;

/// Observation page for station 9091R, filtered to the temperature view.
pub const DEFAULT_URL: &str =
    "https://www.aemet.es/es/eltiempo/observacion/ultimosdatos?k=pva&l=9091R&w=0&datos=det&x=&f=temperatura";

/// Where the rolling hourly series lives.
pub const DEFAULT_HOURLY_PATH: &str = "data/9091R_temp_hourly.csv";

/// Where the long-term archive lives.
pub const DEFAULT_ARCHIVE_PATH: &str = "data/9091R_temp_history.csv";

/// Wall-clock zone the provider publishes its timestamps in.
pub const DEFAULT_TIMEZONE: &str = "Europe/Madrid";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provenance tag written into every merged row.
pub const SOURCE_TAG: &str = "AEMET_ult24h";

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; CYMAP-collector)";

/// How a run treats failures.
///
/// `Strict` surfaces them through the exit code, for schedulers that alert
/// on red runs. `Tolerant` logs and swallows them so a flaky provider does
/// not break an unattended cron chain; it also unlocks the positional
/// timestamp fallback when a delimited export is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    #[default]
    Strict,
    Tolerant,
}

impl Policy {
    pub fn is_tolerant(self) -> bool {
        matches!(self, Policy::Tolerant)
    }
}

/// Everything one collection cycle needs to know.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub url: String,
    pub hourly_path: PathBuf,
    /// Badge directory; `None` skips the badge files entirely.
    pub status_dir: Option<PathBuf>,
    pub timezone: Tz,
    pub timeout: Duration,
    pub policy: Policy,
}
