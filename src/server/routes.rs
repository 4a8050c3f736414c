// src/server/routes.rs

//! Content API route definitions.

use axum::{routing::get, Router};

use super::handlers;
use super::AppState;

/// Create the API router with all catalog routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/banners", get(handlers::banners))
        .route("/trending", get(handlers::trending))
        .route("/recent", get(handlers::recent))
        .route("/dramas", get(handlers::dramas))
        .route("/animes", get(handlers::animes))
        .route("/films", get(handlers::films))
        .route("/bollywood", get(handlers::bollywood))
        .with_state(state)
}
