//! Sitemap handlers.
//!
//! Documents are rendered per request; the builder already degrades on
//! catalog failures so every handler answers 200 with valid XML.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use shelf_core::sitemap::parse_chunk_index;
use shelf_core::SitemapDocument;
use tracing::debug;

use crate::state::AppState;

fn xml_response(document: SitemapDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/xml".to_string()),
            (
                header::CACHE_CONTROL,
                format!("max-age={}", document.max_age),
            ),
        ],
        document.body,
    )
        .into_response()
}

/// GET /sitemap.xml
pub async fn combined(State(state): State<Arc<AppState>>) -> Response {
    xml_response(state.sitemaps().combined())
}

/// GET /sitemap-index.xml
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    xml_response(state.sitemaps().index())
}

/// GET /sitemap-static.xml
pub async fn static_pages(State(state): State<Arc<AppState>>) -> Response {
    xml_response(state.sitemaps().static_pages())
}

/// GET /sitemap-browse.xml
pub async fn browse(State(state): State<Arc<AppState>>) -> Response {
    xml_response(state.sitemaps().browse())
}

/// GET /sitemap-browse-paginated.xml
pub async fn browse_paginated(State(state): State<Arc<AppState>>) -> Response {
    xml_response(state.sitemaps().browse_paginated())
}

/// GET /sitemap-galleries.xml
pub async fn galleries(State(state): State<Arc<AppState>>) -> Response {
    xml_response(state.sitemaps().galleries())
}

/// Prefix of the previous public name of the page-chunk sitemaps.
const LEGACY_CHUNK_PREFIX: &str = "sitemap-manga-pages-";

fn chunk_response(state: &AppState, raw: &str) -> Response {
    match parse_chunk_index(raw) {
        Some(index) => xml_response(state.sitemaps().gallery_pages(index)),
        None => {
            debug!(index = %raw, "Invalid sitemap chunk index");
            (StatusCode::BAD_REQUEST, "Invalid index").into_response()
        }
    }
}

/// GET /sitemap-gallery-pages/{index}
///
/// `index` may carry an `.xml` suffix.
pub async fn gallery_pages(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Response {
    chunk_response(&state, &index)
}

/// GET /{document}
///
/// Single-segment paths not claimed by another route. Serves the
/// `sitemap-manga-pages-{index}` chunks under their previous names and
/// answers 404 for everything else.
pub async fn legacy_document(
    State(state): State<Arc<AppState>>,
    Path(document): Path<String>,
) -> Response {
    match document.strip_prefix(LEGACY_CHUNK_PREFIX) {
        Some(index) => chunk_response(&state, index),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
