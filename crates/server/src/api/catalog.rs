//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shelf_core::{CatalogEntry, CatalogError, CatalogStats};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, e: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// GET /api/v1/catalog/stats
///
/// Counts of galleries, pages, facets and facet links.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogStats>, ApiError> {
    state
        .catalog()
        .stats()
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
}

/// GET /api/v1/galleries/{external_id}
///
/// A stored gallery with its pages, slug and facets.
pub async fn get_gallery(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<u64>,
) -> Result<Json<CatalogEntry>, ApiError> {
    match state.catalog().get(external_id) {
        Ok(entry) => Ok(Json(entry)),
        Err(e @ CatalogError::NotFound(_)) => Err(api_error(StatusCode::NOT_FOUND, e)),
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e)),
    }
}
