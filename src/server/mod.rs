// src/server/mod.rs

//! Content API server.
//!
//! Axum-based HTTP server exposing the aggregated catalog to the frontend.
//! Every endpoint reads straight from the catalog directory, so a pipeline
//! run becomes visible without restarting the server.

mod handlers;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{AppError, Result};
use crate::models::ServerConfig;
use crate::storage::CatalogStore;

pub use routes::create_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
}

/// Content API server.
pub struct ApiServer {
    config: ServerConfig,
    store: Arc<dyn CatalogStore>,
}

impl ApiServer {
    /// Create a new server over the given catalog store.
    pub fn new(config: ServerConfig, store: Arc<dyn CatalogStore>) -> Self {
        Self { config, store }
    }

    /// Run the server until interrupted.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = self.config.listen_addr.parse().map_err(|_| {
            AppError::config(format!(
                "Invalid listen address {:?}",
                self.config.listen_addr
            ))
        })?;

        let state = AppState {
            store: Arc::clone(&self.store),
        };
        let mut app = create_router(state);

        if self.config.cors_enabled {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any)
                .allow_origin(Any);
            app = app.layer(cors);
        }

        let listener = TcpListener::bind(&addr).await?;
        log::info!("Content API listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                log::info!("Content API shutting down");
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_addr_parses() {
        let addr: SocketAddr = ServerConfig::default().listen_addr.parse().unwrap();
        assert_eq!(addr.port(), 8787);
    }
}
