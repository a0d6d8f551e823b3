//! HTTP scraper for the upstream gallery site.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{parse_gallery_html, parse_page_image, GalleryMetadata, GalleryScraper, ScrapeError};
use crate::config::ScraperConfig;
use crate::metrics;

/// Scraper backed by a shared `reqwest` client.
pub struct HttpGalleryScraper {
    client: Client,
    base_url: String,
    fallback_title_prefix: String,
}

impl HttpGalleryScraper {
    /// Create a new scraper with the configured timeout and user agent.
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fallback_title_prefix: config.fallback_title_prefix.clone(),
        })
    }

    /// GET a page and return its body, failing on non-2xx.
    async fn get_html(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url = %url, "Fetching upstream page");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl GalleryScraper for HttpGalleryScraper {
    async fn fetch_metadata(&self, id: u64) -> Result<GalleryMetadata, ScrapeError> {
        let url = format!("{}/g/{}/", self.base_url, id);
        let html = self.get_html(&url).await?;
        parse_gallery_html(&html, id, &self.fallback_title_prefix)
    }

    async fn fetch_page_image(&self, id: u64, page: u32) -> Result<String, ScrapeError> {
        let url = format!("{}/g/{}/{}", self.base_url, id, page);
        let html = self.get_html(&url).await?;
        metrics::PAGES_SCRAPED.inc();
        parse_page_image(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        extract::Path,
        http::{header, HeaderMap, StatusCode},
        response::Html,
        routing::get,
        Router,
    };

    use crate::catalog::{CatalogStore, FacetKind, SqliteCatalog};
    use crate::ingest::Ingestor;
    use crate::testing::fixtures;

    const UPSTREAM_ID: u64 = 42;
    const UPSTREAM_PAGES: u32 = 3;
    const USER_AGENT: &str = "shelf-test/1.0";

    fn page_url(id: u64, page: u32) -> String {
        format!("https://i.example/{}/{}.jpg", id, page)
    }

    async fn gallery_page(
        Path(id): Path<u64>,
        headers: HeaderMap,
    ) -> Result<Html<String>, StatusCode> {
        if headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) != Some(USER_AGENT) {
            return Err(StatusCode::FORBIDDEN);
        }
        if id != UPSTREAM_ID {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(Html(fixtures::gallery_html(
            "Summer Trip",
            &[("Tags:", &["comedy"]), ("Artists:", &["shindol"])],
            UPSTREAM_PAGES,
        )))
    }

    async fn reading_page(Path((id, page)): Path<(u64, u32)>) -> Result<Html<String>, StatusCode> {
        if id != UPSTREAM_ID || page == 0 || page > UPSTREAM_PAGES {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(Html(fixtures::page_html(&page_url(id, page))))
    }

    async fn slow_page() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "too late"
    }

    /// Serve a small upstream site on an ephemeral port and return its URL.
    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/g/{id}/", get(gallery_page))
            .route("/g/{id}/{page}", get(reading_page))
            .route("/slow/g/{id}/", get(slow_page));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn scraper_for(base_url: String, timeout_secs: u32) -> HttpGalleryScraper {
        HttpGalleryScraper::new(&ScraperConfig {
            base_url,
            timeout_secs,
            user_agent: USER_AGENT.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_metadata_from_upstream() {
        let scraper = scraper_for(spawn_upstream().await, 5);

        let meta = scraper.fetch_metadata(UPSTREAM_ID).await.unwrap();

        assert_eq!(meta.id, UPSTREAM_ID);
        assert_eq!(meta.title, "Summer Trip");
        assert_eq!(meta.total_pages, UPSTREAM_PAGES);
        assert_eq!(meta.tags(), ["comedy"]);
        assert_eq!(meta.facets.names(FacetKind::Artist), ["shindol"]);
    }

    #[tokio::test]
    async fn test_fetch_page_image_from_upstream() {
        let scraper = scraper_for(spawn_upstream().await, 5);

        let image = scraper.fetch_page_image(UPSTREAM_ID, 2).await.unwrap();

        assert_eq!(image, page_url(UPSTREAM_ID, 2));
    }

    #[tokio::test]
    async fn test_not_found_is_status_error() {
        let base = spawn_upstream().await;
        let scraper = scraper_for(base.clone(), 5);

        match scraper.fetch_metadata(7).await {
            Err(ScrapeError::Status { status, url }) => {
                assert_eq!(status, 404);
                assert_eq!(url, format!("{}/g/7/", base));
            }
            other => panic!("expected 404 status error, got {:?}", other),
        }

        assert!(matches!(
            scraper.fetch_page_image(UPSTREAM_ID, 99).await,
            Err(ScrapeError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_configured_user_agent_is_sent() {
        let base = spawn_upstream().await;
        let scraper = HttpGalleryScraper::new(&ScraperConfig {
            base_url: base,
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            scraper.fetch_metadata(UPSTREAM_ID).await,
            Err(ScrapeError::Status { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let base = spawn_upstream().await;
        let scraper = scraper_for(format!("{}/slow", base), 1);

        match scraper.fetch_metadata(1).await {
            Err(ScrapeError::HttpError(e)) => assert!(e.is_timeout(), "unexpected error: {}", e),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ingest_over_http_fetches_every_page() {
        let catalog = Arc::new(SqliteCatalog::in_memory().unwrap());
        let scraper = Arc::new(scraper_for(spawn_upstream().await, 5));
        let ingestor = Ingestor::new(catalog.clone(), scraper);

        let outcome = ingestor.ingest(UPSTREAM_ID, &[]).await.unwrap();
        assert_eq!(outcome.slug, "summer-trip");
        assert_eq!(outcome.pages, UPSTREAM_PAGES as usize);

        let entry = catalog.get(UPSTREAM_ID).unwrap();
        let images: Vec<String> = entry.pages.iter().map(|p| p.image_url.clone()).collect();
        assert_eq!(
            images,
            (1..=UPSTREAM_PAGES)
                .map(|page| page_url(UPSTREAM_ID, page))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = ScraperConfig {
            base_url: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        let scraper = HttpGalleryScraper::new(&config).unwrap();
        assert_eq!(scraper.base_url, "http://localhost:9999");
        assert_eq!(scraper.fallback_title_prefix, "nhentai");
    }

    #[tokio::test]
    async fn test_connection_failure_is_http_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let config = ScraperConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let scraper = HttpGalleryScraper::new(&config).unwrap();

        let result = scraper.fetch_metadata(1).await;
        assert!(matches!(result, Err(ScrapeError::HttpError(_))));
    }
}
