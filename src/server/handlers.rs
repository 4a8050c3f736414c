// src/server/handlers.rs

//! Content API request handlers.
//!
//! Catalog endpoints return a `{success, data}` envelope. A missing catalog
//! file yields `success: false` with an empty data array rather than a 404;
//! the frontend treats that as "nothing to show yet".

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::{Category, ContentItem};
use crate::storage::{HERO_BANNER_FILE, RECENT_FILE, TRENDING_FILE, category_index};

use super::AppState;

/// Envelope for every catalog response.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Vec<ContentItem>,
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "healthy": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Hero-banner items for the promotional carousel.
pub async fn banners(State(state): State<AppState>) -> Response {
    serve_catalog(&state, HERO_BANNER_FILE).await
}

/// Global trending selection.
pub async fn trending(State(state): State<AppState>) -> Response {
    serve_catalog(&state, TRENDING_FILE).await
}

/// Most recently scraped items.
pub async fn recent(State(state): State<AppState>) -> Response {
    serve_catalog(&state, RECENT_FILE).await
}

pub async fn dramas(State(state): State<AppState>) -> Response {
    serve_catalog(&state, &category_index(Category::Drama)).await
}

pub async fn animes(State(state): State<AppState>) -> Response {
    serve_catalog(&state, &category_index(Category::Anime)).await
}

pub async fn films(State(state): State<AppState>) -> Response {
    serve_catalog(&state, &category_index(Category::Film)).await
}

pub async fn bollywood(State(state): State<AppState>) -> Response {
    serve_catalog(&state, &category_index(Category::Bollywood)).await
}

async fn serve_catalog(state: &AppState, key: &str) -> Response {
    match state.store.read_catalog(key).await {
        Ok(Some(file)) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: file.results,
            }),
        )
            .into_response(),
        Ok(None) => {
            log::warn!("Catalog file {} not found", key);
            (
                StatusCode::OK,
                Json(ApiResponse {
                    success: false,
                    data: Vec::new(),
                }),
            )
                .into_response()
        }
        Err(error) => {
            log::error!("Failed to read catalog file {}: {}", key, error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse {
                    success: false,
                    data: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::models::{AggregatorConfig, PathsConfig, SourceDump};
    use crate::storage::LocalStore;
    use chrono::Utc;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn state(tmp: &TempDir) -> AppState {
        AppState {
            store: Arc::new(LocalStore::new(tmp.path(), PathsConfig::default())),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn drama_item(id: &str) -> ContentItem {
        let now = Utc::now();
        ContentItem {
            id: id.to_string(),
            title: format!("Title {id}"),
            kind: "drama".to_string(),
            year: Some(2025),
            rating: Some(8.0),
            poster: Some("https://img.example.com/p.jpg".to_string()),
            backdrop: Some("https://img.example.com/b.jpg".to_string()),
            genres: vec![],
            cast: vec![],
            episodes: None,
            url: format!("https://example.com/{id}"),
            source: "dramacool".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_missing_catalog_is_success_false() {
        let tmp = TempDir::new().unwrap();
        let response = dramas(State(state(&tmp))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let value = body_json(response).await;
        assert_eq!(value["success"], false);
        assert_eq!(value["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_serves_written_catalog() {
        let tmp = TempDir::new().unwrap();
        let app_state = state(&tmp);

        let dump = SourceDump::new(
            "dramacool",
            vec![drama_item("dramacool-a"), drama_item("dramacool-b")],
        );
        let bundle = CatalogBuilder::new(AggregatorConfig::default()).build(&[dump], Utc::now());
        app_state.store.write_bundle(&bundle).await.unwrap();

        let response = dramas(State(app_state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["success"], true);
        assert_eq!(value["data"].as_array().unwrap().len(), 2);

        let response = banners(State(app_state)).await;
        let value = body_json(response).await;
        assert_eq!(value["success"], true);
        assert_eq!(value["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let value = body_json(response).await;
        assert_eq!(value["healthy"], true);
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    }
}
