// src/pipeline/aggregate.rs

//! Aggregation pipeline.

use chrono::Utc;

use crate::catalog::CatalogBuilder;
use crate::error::{AppError, Result};
use crate::models::Config;
use crate::storage::CatalogStore;

/// Rebuild the whole catalog from stored dumps.
pub async fn run_aggregate(config: &Config, store: &dyn CatalogStore) -> Result<()> {
    let dumps = store.read_dumps().await?;
    if dumps.is_empty() {
        return Err(AppError::validation(
            "No dumps to aggregate; run a scrape first",
        ));
    }

    log::info!("Aggregating {} dumps", dumps.len());

    let builder = CatalogBuilder::new(config.aggregator.clone());
    let bundle = builder.build(&dumps, Utc::now());

    if bundle.stats.classified() == 0 {
        log::warn!(
            "No classifiable items across {} dumps ({} unclassified)",
            dumps.len(),
            bundle.stats.unclassified
        );
    }

    let summary = store.write_bundle(&bundle).await?;
    log::info!(
        "Catalog updated: {} files written at {}",
        summary.files_written,
        summary.timestamp
    );

    Ok(())
}
