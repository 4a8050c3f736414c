//! Service layer for the catalog pipeline.
//!
//! This module contains the business logic for:
//! - Listing-page extraction (`extractors`)
//! - Relay-driven scraping (`CatalogScraper`)

pub mod extractors;
mod scraper;

pub use scraper::{CatalogScraper, ScrapeOutcome};
