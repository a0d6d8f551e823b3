//! Prometheus metrics for observability.
//!
//! This module provides the HTTP-level metrics of the shelf server and
//! registers the core ingestion, search and sitemap counters next to them:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog size (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shelf_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelf_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "shelf_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Galleries in the catalog.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("shelf_catalog_entries", "Number of galleries in the catalog").unwrap()
});

/// Reading pages in the catalog.
pub static CATALOG_PAGES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("shelf_catalog_pages", "Number of reading pages in the catalog").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_ENTRIES.clone()))
        .unwrap();
    registry.register(Box::new(CATALOG_PAGES.clone())).unwrap();

    // Core metrics (ingestion, search, sitemaps)
    for metric in shelf_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the catalog gauges reflect the store.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(stats) = state.catalog().stats() {
        CATALOG_ENTRIES.set(stats.total_entries as i64);
        CATALOG_PAGES.set(stats.total_pages as i64);
    }
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(\.xml)?(/|$)").unwrap());

static LEGACY_CHUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/sitemap-manga-pages-[^/]*$").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    if LEGACY_CHUNK.is_match(path) {
        return "/sitemap-manga-pages-{id}".to_string();
    }
    // Applied twice: adjacent numeric segments share the separating slash.
    let once = NUMERIC_SEGMENT.replace_all(path, "/{id}$2");
    NUMERIC_SEGMENT.replace_all(&once, "/{id}$2").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_gallery() {
        assert_eq!(
            normalize_path("/api/v1/galleries/177013"),
            "/api/v1/galleries/{id}"
        );
    }

    #[test]
    fn test_normalize_path_sitemap_chunk() {
        assert_eq!(
            normalize_path("/sitemap-gallery-pages/3.xml"),
            "/sitemap-gallery-pages/{id}"
        );
        assert_eq!(
            normalize_path("/sitemap-gallery-pages/12"),
            "/sitemap-gallery-pages/{id}"
        );
    }

    #[test]
    fn test_normalize_path_legacy_chunk() {
        assert_eq!(
            normalize_path("/sitemap-manga-pages-7.xml"),
            "/sitemap-manga-pages-{id}"
        );
        assert_eq!(
            normalize_path("/sitemap-manga-pages-12"),
            "/sitemap-manga-pages-{id}"
        );
    }

    #[test]
    fn test_normalize_path_adjacent_numbers() {
        assert_eq!(normalize_path("/a/1/2/b"), "/a/{id}/{id}/b");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/sitemap.xml"), "/sitemap.xml");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("shelf_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        shelf_core::metrics::INGESTIONS_TOTAL
            .with_label_values(&["success"])
            .inc_by(0);
        CATALOG_ENTRIES.set(0);

        let output = encode_metrics();
        assert!(output.contains("shelf_ingestions_total"));
        assert!(output.contains("shelf_catalog_entries"));
    }
}
