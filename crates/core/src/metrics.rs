//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingestion (results, scraped pages, facet link failures)
//! - Deletion results
//! - Search queries and sitemap generation

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Ingestion Metrics
// =============================================================================

/// Ingestion attempts total by result.
pub static INGESTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelf_ingestions_total", "Total gallery ingestion attempts"),
        &["result"], // "success", "blacklisted", "duplicate", "fetch_failed", ...
    )
    .unwrap()
});

/// Reading pages fetched from upstream.
pub static PAGES_SCRAPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shelf_pages_scraped_total",
        "Total reading pages fetched from upstream",
    )
    .unwrap()
});

/// Facet names that could not be linked, by kind.
pub static FACET_LINK_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelf_facet_link_failures_total",
            "Facet names that failed to link during ingestion",
        ),
        &["kind"],
    )
    .unwrap()
});

/// Deletion attempts total by result.
pub static DELETIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelf_deletions_total", "Total gallery deletion attempts"),
        &["result"], // "success", "not_found", "store_failed"
    )
    .unwrap()
});

// =============================================================================
// Reader Metrics
// =============================================================================

/// Search queries by result.
pub static SEARCH_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelf_search_queries_total", "Total search queries"),
        &["result"], // "empty_query", "hits", "no_hits", "store_failed"
    )
    .unwrap()
});

/// Sitemap documents generated, by document and result.
pub static SITEMAP_DOCUMENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelf_sitemap_documents_total",
            "Sitemap documents generated",
        ),
        &["document", "result"], // result: "ok", "degraded"
    )
    .unwrap()
});

/// Sitemap generation duration in seconds.
pub static SITEMAP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shelf_sitemap_duration_seconds",
            "Duration of sitemap generation",
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["document"],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Ingestion
        Box::new(INGESTIONS_TOTAL.clone()),
        Box::new(PAGES_SCRAPED.clone()),
        Box::new(FACET_LINK_FAILURES.clone()),
        Box::new(DELETIONS_TOTAL.clone()),
        // Reader
        Box::new(SEARCH_QUERIES.clone()),
        Box::new(SITEMAP_DOCUMENTS.clone()),
        Box::new(SITEMAP_DURATION.clone()),
    ]
}
