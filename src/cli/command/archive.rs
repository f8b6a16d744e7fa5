//! Folds the hourly series into the long-term archive.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::series;

/// Merges the hourly CSV into the archive CSV.
///
/// A missing or empty hourly series leaves the archive untouched.
pub fn archive(hourly_path: &Path, archive_path: &Path) -> Result<()> {
    let hourly = series::read_series(hourly_path)
        .with_context(|| format!("reading {}", hourly_path.display()))?;
    if hourly.is_empty() {
        warn!(path = %hourly_path.display(), "hourly series is empty, nothing to fold in");
        return Ok(());
    }

    let existing = series::read_series(archive_path)
        .with_context(|| format!("reading {}", archive_path.display()))?;
    let merged = series::merge_archive(&existing, &hourly);
    series::write_series(archive_path, &merged)
        .with_context(|| format!("writing {}", archive_path.display()))?;

    info!(
        folded = hourly.len(),
        archive = merged.len(),
        path = %archive_path.display(),
        "archive updated"
    );

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::series::read_series;

    const HOURLY: &str = "date_local,time_local,datetime_utc,temp_c,source\n\
                          2024-03-05,14:00,2024-03-05T13:00:00Z,12.3,AEMET_ult24h\n\
                          2024-03-05,15:00,2024-03-05T14:00:00Z,13.0,AEMET_ult24h\n";

    #[test]
    fn should_create_the_archive_on_first_fold() {
        let dir = TempDir::new().unwrap();
        let hourly_path = dir.path().join("hourly.csv");
        let archive_path = dir.path().join("docs").join("history.csv");
        fs::write(&hourly_path, HOURLY).unwrap();

        archive(&hourly_path, &archive_path).unwrap();

        let rows = read_series(&archive_path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].datetime_utc, "2024-03-05T13:00:00Z");
    }

    #[test]
    fn should_overwrite_overlapping_archive_rows() {
        let dir = TempDir::new().unwrap();
        let hourly_path = dir.path().join("hourly.csv");
        let archive_path = dir.path().join("history.csv");
        fs::write(&hourly_path, HOURLY).unwrap();
        fs::write(
            &archive_path,
            "date_local,time_local,datetime_utc,temp_c,source\n\
             2024-03-05,14:00,2024-03-05T13:00:00Z,5.0,AEMET_ult24h\n\
             2024-03-04,14:00,2024-03-04T13:00:00Z,8.1,AEMET_ult24h\n",
        )
        .unwrap();

        archive(&hourly_path, &archive_path).unwrap();

        let rows = read_series(&archive_path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].datetime_utc, "2024-03-04T13:00:00Z");
        assert_eq!(rows[1].temp_c, "12.3");
    }

    #[test]
    fn should_leave_the_archive_alone_without_hourly_rows() {
        let dir = TempDir::new().unwrap();
        let hourly_path = dir.path().join("absent.csv");
        let archive_path = dir.path().join("history.csv");

        archive(&hourly_path, &archive_path).unwrap();

        assert!(!archive_path.exists());
    }
}
