//! End-to-end tests driving the router in-process with a mock upstream.

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;
use shelf_core::testing::RecordedScrape;
use shelf_core::{CatalogStore, ScrapeError};

use common::{fixtures, sitemap_locations, TestFixture, SITE_URL};

// ============================================================================
// Operational routes
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/health").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["site"]["url"], SITE_URL);
    assert_eq!(response.body["site"]["gallery_path"], "hentai");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/health").await;

    let response = fixture.get_text("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("shelf_http_requests_total"));
    assert!(response.body.contains("shelf_catalog_entries"));
}

// ============================================================================
// Migrate
// ============================================================================

#[tokio::test]
async fn test_migrate_stores_gallery() {
    let fixture = TestFixture::new().await;
    fixture
        .scraper
        .add_gallery(fixtures::gallery_metadata(177013, "Attack on Titan!", 3))
        .await;

    let response = fixture
        .post("/api/migrate", json!({ "id": 177013 }))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["slug"], "attack-on-titan");
    assert!(response.body["mangaId"].as_i64().unwrap() > 0);

    let entry = fixture.catalog.get(177013).unwrap();
    assert_eq!(entry.pages.len(), 3);
    assert_eq!(entry.slug.as_deref(), Some("attack-on-titan"));

    let requests = fixture.scraper.recorded().await;
    assert_eq!(requests[0], RecordedScrape::Metadata { id: 177013 });
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_migrate_accepts_string_id() {
    let fixture = TestFixture::new().await;
    fixture
        .scraper
        .add_gallery(fixtures::gallery_metadata(5, "String Id", 1))
        .await;

    let response = fixture.post("/api/migrate", json!({ "id": "5" })).await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["slug"], "string-id");
}

#[tokio::test]
async fn test_migrate_duplicate_fails() {
    let fixture = TestFixture::new().await;
    fixture
        .scraper
        .add_gallery(fixtures::gallery_metadata(7, "Twice", 1))
        .await;

    let first = fixture.post("/api/migrate", json!({ "id": 7 })).await;
    assert_status!(first, StatusCode::OK);

    let second = fixture.post("/api/migrate", json!({ "id": 7 })).await;
    assert_status!(second, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(second.body["success"], false);
    assert_eq!(second.body["message"], "Gallery with ID 7 already exists");

    assert_eq!(fixture.catalog.stats().unwrap().total_entries, 1);
}

#[tokio::test]
async fn test_migrate_blacklisted_tags_rejected() {
    let fixture = TestFixture::new().await;
    fixture
        .scraper
        .add_gallery(fixtures::gallery_metadata(8, "Blocked", 2))
        .await;

    let response = fixture
        .post(
            "/api/migrate",
            json!({ "id": 8, "blacklistTags": ["COMEDY", "yuri"] }),
        )
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body["message"],
        "Post contains blacklisted tag(s): comedy"
    );
    assert!(!fixture.catalog.exists(8).unwrap());

    // Rejected before any reading page is fetched
    assert_eq!(
        fixture.scraper.recorded().await,
        vec![RecordedScrape::Metadata { id: 8 }]
    );
}

#[tokio::test]
async fn test_migrate_upstream_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .scraper
        .set_next_error(ScrapeError::Status {
            status: 503,
            url: "mock://g/9/".to_string(),
        })
        .await;

    let response = fixture.post("/api/migrate", json!({ "id": 9 })).await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["success"], false);
    assert!(response.body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch gallery"));
}

#[tokio::test]
async fn test_migrate_title_without_slug_rejected() {
    let fixture = TestFixture::new().await;
    fixture
        .scraper
        .add_gallery(fixtures::gallery_metadata(10, "!!! ???", 1))
        .await;

    let response = fixture.post("/api/migrate", json!({ "id": 10 })).await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body["message"],
        "Could not generate valid slug from title"
    );
}

#[tokio::test]
async fn test_migrate_invalid_id() {
    let fixture = TestFixture::new().await;

    for body in [json!({}), json!({ "id": 0 }), json!({ "id": "abc" })] {
        let response = fixture.post("/api/migrate", body).await;
        assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["message"], "Invalid `id`.");
    }

    assert!(fixture.scraper.recorded().await.is_empty());
}

#[tokio::test]
async fn test_migrate_malformed_body() {
    let fixture = TestFixture::new().await;

    let response = fixture.post_raw("/api/migrate", "{not json").await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["success"], false);
    assert!(!response.body["message"].as_str().unwrap().is_empty());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_removes_gallery() {
    let fixture = TestFixture::new().await;
    fixture.seed(11, "Going Away");

    let response = fixture
        .delete_with_body("/api/migrate", json!({ "id": "11" }))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));
    assert!(!fixture.catalog.exists(11).unwrap());

    let stats = fixture.catalog.stats().unwrap();
    assert_eq!(stats.total_pages, 0);
    assert_eq!(stats.total_links, 0);
}

#[tokio::test]
async fn test_delete_unknown_gallery() {
    let fixture = TestFixture::new().await;
    fixture.seed(12, "Stays");

    let response = fixture
        .delete_with_body("/api/migrate", json!({ "id": 404 }))
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Gallery with ID 404 not found");
    assert_eq!(fixture.catalog.stats().unwrap().total_entries, 1);
}

#[tokio::test]
async fn test_delete_invalid_id() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .delete_with_body("/api/migrate", json!({ "id": "twelve" }))
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Invalid `id`.");
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_get_gallery() {
    let fixture = TestFixture::new().await;
    fixture.seed(13, "Look Me Up");

    let response = fixture.get("/api/v1/galleries/13").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["external_id"], 13);
    assert_eq!(response.body["slug"], "look-me-up");
    assert_eq!(response.body["pages"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["facets"]["artist"], json!(["shindol"]));
}

#[tokio::test]
async fn test_get_missing_gallery() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/galleries/99").await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Gallery with ID 99 not found");
}

#[tokio::test]
async fn test_catalog_stats() {
    let fixture = TestFixture::new().await;
    fixture.seed(14, "First");
    fixture.seed(15, "Second");

    let response = fixture.get("/api/v1/catalog/stats").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total_entries"], 2);
    assert_eq!(response.body["total_pages"], 4);
    // Both galleries share the fixture artist
    assert_eq!(response.body["facets"]["artist"], 1);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_empty_query() {
    let fixture = TestFixture::new().await;
    fixture.seed(16, "Anything");

    let response = fixture.get("/search?q=%20%20").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "");
    assert_eq!(response.body["galleries"], json!([]));
    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["totalPages"], 1);
    assert_eq!(
        response.body["meta"]["canonical"],
        format!("{}/search", SITE_URL)
    );
}

#[tokio::test]
async fn test_search_matches_title() {
    let fixture = TestFixture::new().await;
    fixture.seed(17, "Attack on Titan");
    fixture.seed(18, "Something Else");

    let response = fixture.get("/search?q=titan").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "titan");
    let galleries = response.body["galleries"].as_array().unwrap();
    assert_eq!(galleries.len(), 1);
    assert_eq!(galleries[0]["slug"], "attack-on-titan");
    assert_eq!(galleries[0]["author"]["name"], "shindol");
    assert!(galleries[0]["featureImage"].is_string());
    assert_eq!(
        response.body["meta"]["canonical"],
        format!("{}/search?q=titan", SITE_URL)
    );
}

#[tokio::test]
async fn test_search_paginates() {
    let fixture = TestFixture::new().await;
    for id in 1..=12 {
        fixture.seed(100 + id, &format!("Series Volume {}", id));
    }

    let first = fixture.get("/search?q=series").await;
    assert_eq!(first.body["galleries"].as_array().unwrap().len(), 10);
    assert_eq!(first.body["totalPages"], 2);

    let second = fixture.get("/search?q=series&page=2").await;
    assert_eq!(second.body["page"], 2);
    assert_eq!(second.body["galleries"].as_array().unwrap().len(), 2);

    let garbage = fixture.get("/search?q=series&page=abc").await;
    assert_status!(garbage, StatusCode::OK);
    assert_eq!(garbage.body["page"], 1);
}

// ============================================================================
// Sitemaps
// ============================================================================

fn assert_xml(response: &common::TextResponse, max_age: u32) {
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "application/xml"
    );
    assert_eq!(
        response.headers[header::CACHE_CONTROL],
        format!("max-age={}", max_age).as_str()
    );
    assert!(response.body.starts_with("<?xml"));
}

#[tokio::test]
async fn test_sitemap_documents_headers() {
    let fixture = TestFixture::new().await;
    fixture.seed(20, "Mapped");

    for (path, max_age) in [
        ("/sitemap.xml", 3600),
        ("/sitemap-index.xml", 3600),
        ("/sitemap-static.xml", 86_400),
        ("/sitemap-browse.xml", 21_600),
        ("/sitemap-browse-paginated.xml", 86_400),
        ("/sitemap-galleries.xml", 43_200),
        ("/sitemap-gallery-pages/0", 3600),
    ] {
        let response = fixture.get_text(path).await;
        assert_xml(&response, max_age);
    }
}

#[tokio::test]
async fn test_sitemap_galleries_lists_landing_and_first_page() {
    let fixture = TestFixture::new().await;
    fixture.seed(21, "Mapped Gallery");

    let response = fixture.get_text("/sitemap-galleries.xml").await;

    assert_eq!(
        sitemap_locations(&response.body),
        vec![
            format!("{}/hentai/mapped-gallery", SITE_URL),
            format!("{}/hentai/mapped-gallery/1", SITE_URL),
        ]
    );
}

#[tokio::test]
async fn test_sitemap_index_lists_page_chunks() {
    let fixture = TestFixture::new().await;
    fixture.seed(22, "Chunked");

    let response = fixture.get_text("/sitemap-index.xml").await;

    let locs = sitemap_locations(&response.body);
    assert_eq!(locs.len(), 5);
    assert_eq!(locs[0], format!("{}/sitemap-static.xml", SITE_URL));
    assert_eq!(
        locs[4],
        format!("{}/sitemap-gallery-pages/0.xml", SITE_URL)
    );
}

#[tokio::test]
async fn test_sitemap_gallery_pages_with_suffix() {
    let fixture = TestFixture::new().await;
    fixture.seed(23, "Two Pages");

    let response = fixture.get_text("/sitemap-gallery-pages/0.xml").await;
    assert_xml(&response, 3600);
    assert_eq!(
        sitemap_locations(&response.body),
        vec![
            format!("{}/hentai/two-pages/1", SITE_URL),
            format!("{}/hentai/two-pages/2", SITE_URL),
        ]
    );

    let beyond = fixture.get_text("/sitemap-gallery-pages/1.xml").await;
    assert_xml(&beyond, 3600);
    assert!(sitemap_locations(&beyond.body).is_empty());
}

#[tokio::test]
async fn test_sitemap_gallery_pages_invalid_index() {
    let fixture = TestFixture::new().await;

    for path in ["/sitemap-gallery-pages/abc", "/sitemap-gallery-pages/-1.xml"] {
        let response = fixture.get_text(path).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, "Invalid index");
    }
}

#[tokio::test]
async fn test_sitemap_gallery_pages_huge_index_is_empty() {
    let fixture = TestFixture::new().await;
    fixture.seed(25, "Far Away");

    for path in [
        "/sitemap-gallery-pages/18446744073709551615",
        "/sitemap-gallery-pages/368934881474191.xml",
    ] {
        let response = fixture.get_text(path).await;
        assert_xml(&response, 3600);
        assert!(sitemap_locations(&response.body).is_empty());
    }
}

#[tokio::test]
async fn test_legacy_sitemap_names_serve_same_documents() {
    let fixture = TestFixture::new().await;
    fixture.seed(26, "Old Names");

    for (legacy, current, max_age) in [
        ("/sitemap-manga.xml", "/sitemap-galleries.xml", 43_200),
        (
            "/sitemap-browse-categories.xml",
            "/sitemap-browse-paginated.xml",
            86_400,
        ),
        ("/sitemap-manga-pages-0", "/sitemap-gallery-pages/0", 3600),
        ("/sitemap-manga-pages-0.xml", "/sitemap-gallery-pages/0.xml", 3600),
    ] {
        let old = fixture.get_text(legacy).await;
        let new = fixture.get_text(current).await;
        assert_xml(&old, max_age);
        assert_eq!(
            sitemap_locations(&old.body),
            sitemap_locations(&new.body),
            "{} should match {}",
            legacy,
            current
        );
    }

    let chunk = fixture.get_text("/sitemap-manga-pages-0.xml").await;
    assert_eq!(
        sitemap_locations(&chunk.body),
        vec![
            format!("{}/hentai/old-names/1", SITE_URL),
            format!("{}/hentai/old-names/2", SITE_URL),
        ]
    );
}

#[tokio::test]
async fn test_legacy_chunk_name_invalid_index() {
    let fixture = TestFixture::new().await;

    for path in ["/sitemap-manga-pages-abc", "/sitemap-manga-pages-.xml"] {
        let response = fixture.get_text(path).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, "Invalid index");
    }
}

#[tokio::test]
async fn test_unknown_top_level_document_is_not_found() {
    let fixture = TestFixture::new().await;

    for path in ["/sitemap-unknown.xml", "/robots.txt"] {
        let response = fixture.get_text(path).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", path);
    }
}

#[tokio::test]
async fn test_sitemap_browse_lists_facets() {
    let fixture = TestFixture::new().await;
    fixture.seed(24, "Browsable");

    let response = fixture.get_text("/sitemap-browse.xml").await;
    let locs = sitemap_locations(&response.body);

    assert!(locs.contains(&format!("{}/browse/artists/shindol", SITE_URL)));
    assert!(locs.contains(&format!("{}/browse/artists/shindol?page=5", SITE_URL)));
    assert!(locs.contains(&format!("{}/browse/languages/english", SITE_URL)));
    assert!(!locs.contains(&format!("{}/browse/languages/english?page=2", SITE_URL)));
}
