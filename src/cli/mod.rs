//! Command line interface.

pub mod command;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use tracing::Level;

use crate::config::{self, FetchConfig, Policy};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity: trace, debug, info, warn or error
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape the last-24h observations and merge them into the hourly CSV
    Fetch(FetchArgs),
    /// Fold the hourly CSV into the long-term archive
    Archive(ArchiveArgs),
}

#[derive(Args)]
pub struct FetchArgs {
    /// Observation page to scrape
    #[arg(long, default_value = config::DEFAULT_URL)]
    pub url: String,

    /// Hourly series CSV
    #[arg(long, default_value = config::DEFAULT_HOURLY_PATH)]
    pub out: PathBuf,

    /// Directory for the last-update badge files; defaults to the directory
    /// of the hourly series
    #[arg(long)]
    pub status_dir: Option<PathBuf>,

    /// Skip writing the badge files
    #[arg(long)]
    pub no_status: bool,

    /// IANA zone the provider's wall-clock timestamps are in
    #[arg(long, default_value = config::DEFAULT_TIMEZONE)]
    pub timezone: Tz,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Log failures instead of failing the run, as the unattended
    /// collector does
    #[arg(long)]
    pub tolerant: bool,
}

impl FetchArgs {
    /// Folds the flags into a run configuration.
    pub fn into_config(self) -> FetchConfig {
        let status_dir = if self.no_status {
            None
        } else {
            Some(self.status_dir.unwrap_or_else(|| parent_dir(&self.out)))
        };

        FetchConfig {
            url: self.url,
            hourly_path: self.out,
            status_dir,
            timezone: self.timezone,
            timeout: Duration::from_secs(self.timeout_secs),
            policy: if self.tolerant {
                Policy::Tolerant
            } else {
                Policy::Strict
            },
        }
    }
}

#[derive(Args)]
pub struct ArchiveArgs {
    /// Hourly series CSV to fold in
    #[arg(long, default_value = config::DEFAULT_HOURLY_PATH)]
    pub hourly: PathBuf,

    /// Archive CSV
    #[arg(long, default_value = config::DEFAULT_ARCHIVE_PATH)]
    pub out: PathBuf,
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

// -- Tests -------------------------------------------------------------------
