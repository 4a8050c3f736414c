// src/lib.rs

//! FloDrama Catalog Pipeline Library

pub mod catalog;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod relay;
#[cfg(feature = "serve")]
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
