// src/services/scraper.rs

//! Catalog scraper service.
//!
//! Walks every enabled source's listing pages through the relay client, runs
//! the matching site extractor over each fetched page and dedupes the rows
//! into one [`SourceDump`] per source. Sources run concurrently, bounded by
//! `scraper.max_concurrent`; pages within a source run sequentially with a
//! politeness delay.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, ContentItem, SourceDump, SourceSite};
use crate::relay::RelayClient;
use crate::services::extractors;

/// Summary of a scrape run.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub dumps: Vec<SourceDump>,
    pub page_total: usize,
    pub page_failures: usize,
    pub source_failures: usize,
}

/// Per-source tally folded into a [`ScrapeOutcome`].
#[derive(Debug, Default)]
struct SourceReport {
    source_id: String,
    dump: Option<SourceDump>,
    pages: usize,
    failures: usize,
}

/// Service for scraping listing pages into source dumps.
pub struct CatalogScraper {
    config: Arc<Config>,
    relay: Arc<RelayClient>,
}

impl CatalogScraper {
    /// Create a new scraper with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let relay = Arc::new(RelayClient::new(config.relay.clone())?);
        Ok(Self { config, relay })
    }

    /// Scrape every enabled source.
    pub async fn scrape_all(&self) -> ScrapeOutcome {
        let enabled: Vec<&SourceSite> = self
            .config
            .sources
            .iter()
            .filter(|source| source.enabled)
            .collect();
        self.scrape_sources(&enabled).await
    }

    /// Scrape the given sources concurrently, bounded by `max_concurrent`.
    pub async fn scrape_sources(&self, sources: &[&SourceSite]) -> ScrapeOutcome {
        let concurrency = self.config.scraper.max_concurrent.max(1);

        let mut outcome = ScrapeOutcome::default();
        let mut source_stream = stream::iter(sources.iter().copied())
            .map(|source| async move { self.scrape_source(source).await })
            .buffer_unordered(concurrency);

        while let Some(report) = source_stream.next().await {
            outcome.page_total += report.pages;
            outcome.page_failures += report.failures;
            match report.dump {
                Some(dump) => outcome.dumps.push(dump),
                None => {
                    outcome.source_failures += 1;
                    log::warn!("{}: no items extracted, dump skipped", report.source_id);
                }
            }
        }

        // buffer_unordered completion order is nondeterministic.
        outcome.dumps.sort_by(|a, b| a.source.cmp(&b.source));
        outcome
    }

    /// Scrape one source's listing pages in order.
    async fn scrape_source(&self, source: &SourceSite) -> SourceReport {
        let delay = Duration::from_millis(self.config.scraper.request_delay_ms);
        let urls = source.listing_urls(self.config.scraper.max_pages);

        let mut report = SourceReport {
            source_id: source.id.clone(),
            ..SourceReport::default()
        };
        let mut seen = HashSet::new();
        let mut items: Vec<ContentItem> = Vec::new();

        for (index, url) in urls.iter().enumerate() {
            if index > 0 && delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }

            report.pages += 1;
            let html = match self.relay.fetch_html(url).await {
                Ok(html) => html,
                Err(error) => {
                    report.failures += 1;
                    log::warn!("{}: failed to fetch {}: {}", source.id, url, error);
                    continue;
                }
            };

            let extracted = match extractors::extract(source, &html) {
                Ok(extracted) => extracted,
                Err(error) => {
                    report.failures += 1;
                    log::warn!("{}: failed to extract {}: {}", source.id, url, error);
                    continue;
                }
            };

            let before = items.len();
            for item in extracted {
                if seen.insert(item.id.clone()) {
                    items.push(item);
                }
            }
            log::debug!(
                "{}: {} new items from {}",
                source.id,
                items.len() - before,
                url
            );
        }

        log::info!(
            "{}: {} items from {} pages ({} failed)",
            source.id,
            items.len(),
            report.pages,
            report.failures
        );

        if !items.is_empty() {
            report.dump = Some(SourceDump::new(source.id.clone(), items));
        }
        report
    }
}
