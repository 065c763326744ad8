//! dex-catalog library interface
//!
//! Data-shaping layer over a paginated REST collection: windowed fetching,
//! detail enrichment, ordering, incremental pagination and search, served
//! over HTTP.

pub mod api;
pub mod catalog;
pub mod error;
pub mod services;
pub mod types;
pub mod upstream;

pub use crate::catalog::{Catalog, CatalogOptions, RecordDetail};
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::catalog_routes())
        .merge(api::record_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
