use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{catalog, handlers, middleware::metrics_middleware, migrate, search, sitemaps};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Operational API
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/catalog/stats", get(catalog::get_stats))
        .route("/galleries/{external_id}", get(catalog::get_gallery))
        .with_state(Arc::clone(&state));

    // Site routes
    let site_routes = Router::new()
        .route(
            "/api/migrate",
            axum::routing::post(migrate::migrate_gallery).delete(migrate::delete_gallery),
        )
        .route("/search", get(search::search))
        .route("/sitemap.xml", get(sitemaps::combined))
        .route("/sitemap-index.xml", get(sitemaps::index))
        .route("/sitemap-static.xml", get(sitemaps::static_pages))
        .route("/sitemap-browse.xml", get(sitemaps::browse))
        .route(
            "/sitemap-browse-paginated.xml",
            get(sitemaps::browse_paginated),
        )
        .route("/sitemap-galleries.xml", get(sitemaps::galleries))
        .route("/sitemap-gallery-pages/{index}", get(sitemaps::gallery_pages))
        // Previous public names, still referenced by crawlers
        .route("/sitemap-manga.xml", get(sitemaps::galleries))
        .route(
            "/sitemap-browse-categories.xml",
            get(sitemaps::browse_paginated),
        )
        .route("/{document}", get(sitemaps::legacy_document))
        .route("/metrics", get(handlers::metrics))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(site_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
