//! One collection cycle: scrape, extract, merge, rewrite.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    cli::create_spinner,
    config::{self, FetchConfig, Policy},
    download,
    parse::{self, ExtractStats, Observation},
    series, status,
};

/// Runs one collection cycle against the hourly series.
///
/// Under the tolerant policy every failure is logged and swallowed so an
/// unattended schedule stays green.
pub async fn fetch(cfg: &FetchConfig) -> Result<()> {
    settle(cfg.policy, cycle(cfg).await)
}

/// Applies the run policy to a cycle outcome.
fn settle(policy: Policy, outcome: Result<()>) -> Result<()> {
    match outcome {
        Err(failure) if policy.is_tolerant() => {
            warn!("non-critical failure: {failure:#}");
            Ok(())
        }
        other => other,
    }
}

async fn cycle(cfg: &FetchConfig) -> Result<()> {
    let client = download::build_client(config::USER_AGENT, cfg.timeout)?;

    let bar = create_spinner("Fetching the observation page...".to_string());
    let page = download::fetch_page(&client, &cfg.url).await?;
    bar.finish_with_message("Observation page fetched");

    let (observations, stats) = match export_observations(&client, cfg, &page).await? {
        Some(extracted) => extracted,
        None => parse::from_html(&page, cfg.timezone)?,
    };
    debug!(
        extracted = stats.extracted,
        skipped_short = stats.skipped_short,
        skipped_datetime = stats.skipped_datetime,
        skipped_temperature = stats.skipped_temperature,
        "row accounting"
    );
    if observations.is_empty() {
        return Err(parse::Error::NoObservations.into());
    }

    let existing = series::read_series(&cfg.hourly_path)
        .with_context(|| format!("reading {}", cfg.hourly_path.display()))?;
    let merged = series::merge(&existing, &observations, cfg.timezone, config::SOURCE_TAG);
    series::write_series(&cfg.hourly_path, &merged)
        .with_context(|| format!("writing {}", cfg.hourly_path.display()))?;

    if let Some(dir) = &cfg.status_dir {
        let badge = status::LastUpdate::now(cfg.timezone, observations.len());
        status::write_status(dir, &badge)
            .with_context(|| format!("writing badges under {}", dir.display()))?;
    }

    info!(
        extracted = observations.len(),
        series = merged.len(),
        path = %cfg.hourly_path.display(),
        "hourly series updated"
    );

    Ok(())
}

/// Tries the linked CSV export first; `None` sends the caller to the
/// page table.
async fn export_observations(
    client: &Client,
    cfg: &FetchConfig,
    page: &str,
) -> Result<Option<(Vec<Observation>, ExtractStats)>> {
    let Some(href) = download::find_export_href(page) else {
        return Ok(None);
    };
    let url = download::resolve_href(&cfg.url, &href)?;
    debug!(%url, "the page links a CSV export");

    let export = download::fetch_export(client, &url).await?;
    match parse::from_delimited(&export, cfg.timezone, cfg.policy.is_tolerant()) {
        Ok((observations, stats)) if !observations.is_empty() => Ok(Some((observations, stats))),
        Ok(_) => {
            debug!("the export came back empty, scraping the page table instead");
            Ok(None)
        }
        Err(failure) => {
            debug!(%failure, "the export was unusable, scraping the page table instead");
            Ok(None)
        }
    }
}

// -- Tests -------------------------------------------------------------------
