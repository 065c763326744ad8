//! Record detail, image and weakness handlers

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::RecordDetail,
    error::{ApiError, ApiResult},
    types::RecordId,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: RecordId,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeaknessParams {
    /// Comma-separated category names
    #[serde(default)]
    pub categories: String,
}

#[derive(Debug, Serialize)]
pub struct WeaknessResponse {
    pub categories: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// GET /api/records/:id
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<RecordDetail>> {
    let detail = state.catalog.record_detail(id).await?;
    Ok(Json(detail))
}

/// GET /api/records/:id/image
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<ImageResponse>> {
    if id == 0 || id > state.catalog.max_id() {
        return Err(ApiError::NotFound(format!(
            "Id {} outside 1..={}",
            id,
            state.catalog.max_id()
        )));
    }

    Ok(Json(ImageResponse {
        id,
        url: state.catalog.image_url_for(id),
    }))
}

/// GET /api/weaknesses?categories=a,b
pub async fn get_weaknesses(
    State(state): State<AppState>,
    Query(params): Query<WeaknessParams>,
) -> Json<WeaknessResponse> {
    let categories: Vec<String> = params
        .categories
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    let weaknesses = state.catalog.weaknesses_of(&categories);
    Json(WeaknessResponse {
        categories,
        weaknesses,
    })
}

/// Build record routes
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/api/records/:id", get(get_record))
        .route("/api/records/:id/image", get(get_image))
        .route("/api/weaknesses", get(get_weaknesses))
}
