//! HTTP surface over the city store

pub mod docs;
pub mod error;
pub mod handlers;

use crate::store::CityStore;
use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CityStore>,
    pub docs: Arc<Value>,
}

impl AppState {
    pub fn new(store: CityStore, server_url: &str) -> Self {
        Self {
            store: Arc::new(store),
            docs: Arc::new(docs::openapi_document(server_url)),
        }
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
}

/// Build the application router. Paths outside `/api` are served from `public_dir`.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/docs", get(docs::swagger_ui))
        .route("/api/docs.json", get(docs::openapi_json))
        .route("/api/cities", get(handlers::list).post(handlers::create))
        .route(
            "/api/cities/{id}",
            get(handlers::get_by_id)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}
