use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shelf_core::search::parse_page;
use shelf_core::SearchPage;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    /// Kept as text so a malformed page falls back to 1 instead of a 400.
    #[serde(default)]
    pub page: Option<String>,
}

/// GET /search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchPage> {
    let query = params.q.unwrap_or_default();
    let page = parse_page(params.page.as_deref());
    Json(state.search().search(&query, page))
}
