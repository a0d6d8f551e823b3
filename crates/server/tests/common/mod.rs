//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by a temporary SQLite catalog and a mock upstream scraper, so the
//! whole HTTP surface can be exercised without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use shelf_core::testing::MockGalleryScraper;
use shelf_core::{
    CatalogStore, Config, DatabaseConfig, GalleryScraper, SiteConfig, SqliteCatalog,
};
use shelf_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use shelf_core::testing::fixtures;

/// Public site URL used by every fixture.
pub const SITE_URL: &str = "https://shelf.test";

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_migrate() {
///     let fixture = TestFixture::new().await;
///     fixture.scraper.add_gallery(fixtures::gallery_metadata(1, "Title", 2)).await;
///
///     let response = fixture.post("/api/migrate", json!({ "id": 1 })).await;
///
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock upstream - configure galleries and failures
    pub scraper: Arc<MockGalleryScraper>,
    /// Direct handle on the catalog for seeding and assertions
    pub catalog: Arc<SqliteCatalog>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a JSON request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Response kept as text, for XML and plain bodies
#[derive(Debug)]
pub struct TextResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestFixture {
    /// Create a new test fixture with an empty catalog.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            site: SiteConfig {
                url: SITE_URL.to_string(),
                ..SiteConfig::default()
            },
            ..Config::default()
        };

        let scraper = Arc::new(MockGalleryScraper::new());
        let catalog = Arc::new(SqliteCatalog::new(&db_path).expect("Failed to create catalog"));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn CatalogStore>,
            Arc::clone(&scraper) as Arc<dyn GalleryScraper>,
        ));

        let router = create_router(state);

        Self {
            router,
            scraper,
            catalog,
            temp_dir,
        }
    }

    /// Store a two-page fixture gallery directly in the catalog.
    pub fn seed(&self, external_id: u64, title: &str) {
        self.catalog
            .insert_gallery(&fixtures::new_gallery(external_id, title))
            .expect("Failed to seed gallery");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request with JSON body.
    pub async fn delete_with_body(&self, path: &str, body: Value) -> TestResponse {
        self.request("DELETE", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, _, bytes) = self.send(request).await;
        TestResponse {
            status,
            body: parse_json(&bytes),
        }
    }

    /// Send a GET request and keep the body as text.
    pub async fn get_text(&self, path: &str) -> TextResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let (status, headers, bytes) = self.send(request).await;
        TextResponse {
            status,
            headers,
            body: String::from_utf8(bytes).expect("Body is not UTF-8"),
        }
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        let (status, _, bytes) = self.send(request).await;

        TestResponse {
            status,
            body: parse_json(&bytes),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, headers, body_bytes.to_vec())
    }
}

fn parse_json(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    }
}

/// Text of every `<loc>` element of a sitemap document.
pub fn sitemap_locations(xml: &str) -> Vec<String> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut in_loc = false;
    let mut locs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(e)) if in_loc => {
                locs.push(e.unescape().expect("Invalid text").into_owned())
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("Invalid sitemap XML: {}", e),
            _ => {}
        }
        buf.clear();
    }

    locs
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
