//! Pipeline entry points for catalog operations.
//!
//! - `run_scrape`: Fetch listing pages and write per-source dumps
//! - `run_aggregate`: Rebuild the catalog from stored dumps

mod aggregate;
mod scrape;

pub use aggregate::run_aggregate;
pub use scrape::run_scrape;
