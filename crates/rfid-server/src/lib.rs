//! RFID relay server library logic.

pub mod api;
pub mod api_sse;
pub mod api_ws;
pub mod config;

use axum::{routing::get, Extension, Json, Router};
use rfid_core::{Denylist, RelayError, ScanRelay};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ingestion core: history, denylist, and observer hub.
    pub relay: Arc<ScanRelay>,
    /// Directory holding the viewer page, served as the router fallback.
    pub static_dir: Option<String>,
}

impl AppState {
    /// Builds the state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidCapacity` for a zero history capacity.
    pub fn from_config(config: &config::Config) -> Result<Self, RelayError> {
        let denylist: Denylist = config.validation.denylist.iter().cloned().collect();
        let relay = ScanRelay::new(config.history.capacity, denylist)?;
        Ok(Self {
            relay: Arc::new(relay),
            static_dir: Some(config.static_files.dir.clone()),
        })
    }

    /// State with the given relay and no static files. Used by tests and
    /// embedders.
    pub fn with_relay(relay: ScanRelay) -> Self {
        Self {
            relay: Arc::new(relay),
            static_dir: None,
        }
    }
}

/// Health check handler.
async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "observers": state.relay.hub().observer_count(),
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(api::submit_scan_handler))
        .route("/health", get(health))
        .route("/api/history", get(api::get_history_handler))
        .route("/events/stream", get(api_sse::get_list_stream_handler))
        .route("/ws", get(api_ws::ws_handler));

    let router = match state.static_dir.as_deref() {
        Some(dir) if std::path::Path::new(dir).join("index.html").exists() => {
            tracing::info!(path = %dir, "serving viewer static files");
            let index = format!("{}/index.html", dir);
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        Some(dir) => {
            tracing::info!(path = %dir, "viewer directory not found, skipping static file serving");
            router
        }
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
