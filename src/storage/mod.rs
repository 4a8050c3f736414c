//! Storage for scrape dumps and the aggregated catalog.
//!
//! ## Directory Structure
//!
//! ```text
//! {data_dir}/
//! ├── config.toml
//! ├── dumps/                  # One JSON dump per source
//! │   ├── aniwatch.json
//! │   └── dramacool.json
//! └── catalog/                # Aggregator output, rewritten every run
//!     ├── trending.json       # Global selections
//!     ├── hero_banner.json
//!     ├── recent.json
//!     └── dramas/             # One directory per category
//!         ├── index.json
//!         ├── chunk_1.json    # Only when the category overflows
//!         ├── trending.json
//!         └── hero_banner.json
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::catalog::CatalogBundle;
use crate::error::Result;
use crate::models::{Category, CategoryFile, SourceDump};

// Re-export for convenience
pub use local::LocalStore;

/// File name of the trending selection, global and per category.
pub const TRENDING_FILE: &str = "trending.json";

/// File name of the hero-banner selection, global and per category.
pub const HERO_BANNER_FILE: &str = "hero_banner.json";

/// File name of the global recent selection.
pub const RECENT_FILE: &str = "recent.json";

/// Catalog-relative key of a category's index file.
pub fn category_index(category: Category) -> String {
    format!("{}/index.json", category.dir_name())
}

/// Metadata about a catalog write.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    /// Number of catalog files written
    pub files_written: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for catalog storage backends.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist one source dump as `dumps/{source}.json`.
    async fn write_dump(&self, dump: &SourceDump) -> Result<()>;

    /// Load every readable dump, ordered by file name.
    ///
    /// Unreadable dump files are logged and skipped so one corrupt dump
    /// cannot block aggregation.
    async fn read_dumps(&self) -> Result<Vec<SourceDump>>;

    /// Persist an aggregated bundle, replacing the previous catalog.
    async fn write_bundle(&self, bundle: &CatalogBundle) -> Result<WriteSummary>;

    /// Read one catalog file by its catalog-relative key.
    async fn read_catalog(&self, key: &str) -> Result<Option<CategoryFile>>;
}
