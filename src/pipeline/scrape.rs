// src/pipeline/scrape.rs

//! Scraping pipeline.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, SourceSite};
use crate::services::CatalogScraper;
use crate::storage::CatalogStore;

/// Run the scraper and persist one dump per source.
///
/// `only` restricts the run to a single source id.
pub async fn run_scrape(
    config: &Config,
    store: &dyn CatalogStore,
    only: Option<&str>,
) -> Result<()> {
    let started = Utc::now();

    let targets: Vec<&SourceSite> = config
        .sources
        .iter()
        .filter(|source| source.enabled)
        .filter(|source| only.is_none_or(|id| source.id == id))
        .collect();

    if targets.is_empty() {
        return Err(match only {
            Some(id) => AppError::validation(format!("No enabled source matches {id:?}")),
            None => AppError::validation("No enabled sources configured"),
        });
    }

    log::info!("Scraping {} sources", targets.len());

    let scraper = CatalogScraper::new(Arc::new(config.clone()))?;
    let outcome = scraper.scrape_sources(&targets).await;

    for dump in &outcome.dumps {
        store.write_dump(dump).await?;
    }

    let elapsed = Utc::now() - started;
    log::info!(
        "Scrape finished in {}s: {} dumps written, {}/{} pages failed, {} sources empty",
        elapsed.num_seconds(),
        outcome.dumps.len(),
        outcome.page_failures,
        outcome.page_total,
        outcome.source_failures
    );

    Ok(())
}
