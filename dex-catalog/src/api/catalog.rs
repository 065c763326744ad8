//! Catalog browsing handlers
//!
//! Stateful routes operate on the shared pagination engine and answer with
//! the resulting view snapshot; `/api/catalog/page` is stateless.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    types::{CatalogView, EnrichedRecord, PageCursor, SortKey},
    AppState,
};

/// POST /api/catalog/sort body
#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Option<String>,
}

/// Stateless page response
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub records: Vec<EnrichedRecord>,
    pub offset: usize,
    pub limit: usize,
    pub sort: SortKey,
    pub total: Option<usize>,
}

/// GET /api/catalog
pub async fn get_view(State(state): State<AppState>) -> Json<CatalogView> {
    Json(state.catalog.view().await)
}

/// POST /api/catalog/load-more
pub async fn load_more(State(state): State<AppState>) -> Json<CatalogView> {
    Json(state.catalog.load_more().await)
}

/// POST /api/catalog/sort
pub async fn change_sort(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> ApiResult<Json<CatalogView>> {
    let sort_key: SortKey = request.sort.parse()?;
    info!(sort = %sort_key, "Sort change requested");
    Ok(Json(state.catalog.change_sort(sort_key).await))
}

/// GET /api/catalog/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<CatalogView> {
    Json(state.catalog.search(&params.q).await)
}

/// DELETE /api/catalog/search
pub async fn clear_search(State(state): State<AppState>) -> Json<CatalogView> {
    Json(state.catalog.clear_search().await)
}

/// GET /api/catalog/page?offset=&limit=&sort=
pub async fn list_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PageResponse>> {
    let sort_key = match params.sort.as_deref() {
        Some(raw) => raw.parse::<SortKey>()?,
        None => SortKey::default(),
    };

    let max = state.catalog.max_id() as usize;
    let limit = params.limit.unwrap_or(state.catalog.page_size());
    if limit == 0 || limit > max {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            max
        )));
    }

    let cursor = PageCursor {
        offset: params.offset.unwrap_or(0),
        page_size: limit,
    };
    let page = state.catalog.list_page(cursor, sort_key).await;

    Ok(Json(PageResponse {
        records: page.records,
        offset: cursor.offset,
        limit,
        sort: sort_key,
        total: page.total,
    }))
}

/// Build catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/catalog", get(get_view))
        .route("/api/catalog/load-more", post(load_more))
        .route("/api/catalog/sort", post(change_sort))
        .route("/api/catalog/search", get(search).delete(clear_search))
        .route("/api/catalog/page", get(list_page))
}
