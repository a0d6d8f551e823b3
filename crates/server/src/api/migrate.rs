//! Gallery ingestion and removal handlers.
//!
//! Every failure, including a body that does not parse, is reported as
//! `500 { success: false, message }`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use shelf_core::IngestError;
use tracing::{info, warn};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Gallery id as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GalleryId {
    Number(Number),
    Text(String),
}

impl GalleryId {
    pub fn resolve(&self) -> Result<u64, IngestError> {
        match self {
            GalleryId::Number(n) => n.as_u64().ok_or(IngestError::InvalidId),
            GalleryId::Text(s) => s.trim().parse().map_err(|_| IngestError::InvalidId),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateRequest {
    #[serde(default)]
    pub id: Option<GalleryId>,
    #[serde(default)]
    pub blacklist_tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub id: Option<GalleryId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateResponse {
    pub success: bool,
    pub manga_id: i64,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
}

fn failure(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FailureResponse {
            success: false,
            message,
        }),
    )
        .into_response()
}

fn resolve_id(id: Option<&GalleryId>) -> Result<u64, IngestError> {
    id.ok_or(IngestError::InvalidId)?.resolve()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/migrate
///
/// Scrape a gallery from upstream and store it.
pub async fn migrate_gallery(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MigrateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected migrate request body");
            return failure(rejection.body_text());
        }
    };

    let external_id = match resolve_id(request.id.as_ref()) {
        Ok(id) => id,
        Err(e) => return failure(e.to_string()),
    };

    match state
        .ingestor()
        .ingest(external_id, &request.blacklist_tags)
        .await
    {
        Ok(outcome) => {
            info!(
                external_id,
                id = outcome.id,
                slug = %outcome.slug,
                pages = outcome.pages,
                "Gallery migrated"
            );
            Json(MigrateResponse {
                success: true,
                manga_id: outcome.id,
                slug: outcome.slug,
            })
            .into_response()
        }
        Err(e) => {
            warn!(external_id, error = %e, "Gallery migration failed");
            failure(e.to_string())
        }
    }
}

/// DELETE /api/migrate
///
/// Remove a stored gallery with everything that belongs to it.
pub async fn delete_gallery(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected delete request body");
            return failure(rejection.body_text());
        }
    };

    let result = resolve_id(request.id.as_ref())
        .and_then(|external_id| state.ingestor().remove(external_id).map(|_| external_id));

    match result {
        Ok(external_id) => {
            info!(external_id, "Gallery deleted");
            Json(DeleteResponse { success: true }).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Gallery deletion failed");
            failure(e.to_string())
        }
    }
}
