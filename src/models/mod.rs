// src/models/mod.rs

//! Domain models for the catalog pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod content;
mod source;

// Re-export all public types
pub use config::{
    AggregatorConfig, Config, PathsConfig, RelayConfig, ScraperConfig, ServerConfig,
};
pub use content::{Category, CategoryFile, ContentItem, SourceDump, classify};
pub use source::{ExtractorKind, SourceSite};
