//! Catalog aggregation.
//!
//! Pure classification, ordering and selection logic over scraped dumps.
//! Persistence of the resulting bundle lives in [`crate::storage`].

mod build;

pub use build::{BuildStats, CatalogBuilder, CatalogBundle, CategoryBundle};
