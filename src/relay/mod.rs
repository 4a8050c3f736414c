//! Relay fleet plumbing for fetching third-party HTML.
//!
//! - `RelayPool`: in-memory rotation and failure tracking over the fleet
//! - `RelayClient`: retrying fetches through relays with a direct fallback

mod client;
mod pool;

pub use client::RelayClient;
pub use pool::{RelayPool, RelayServer};
