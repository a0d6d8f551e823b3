//! Mock upstream scraper for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::scrape::{GalleryMetadata, GalleryScraper, ScrapeError};

/// A recorded scrape request for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedScrape {
    Metadata { id: u64 },
    Page { id: u64, page: u32 },
}

/// Mock implementation of the GalleryScraper trait.
///
/// Provides controllable behavior for testing:
/// - Serve configurable gallery metadata (unknown ids answer 404)
/// - Serve page images, defaulting to a predictable URL per page
/// - Track requests for assertions
/// - Simulate failures
#[derive(Debug, Clone)]
pub struct MockGalleryScraper {
    /// Metadata by gallery id.
    galleries: Arc<RwLock<HashMap<u64, GalleryMetadata>>>,
    /// Page image overrides by (gallery id, page).
    pages: Arc<RwLock<HashMap<(u64, u32), String>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<RecordedScrape>>>,
    /// Page number whose fetch fails.
    failing_page: Arc<RwLock<Option<u32>>>,
    /// If set, the next metadata fetch will fail with this error.
    next_error: Arc<RwLock<Option<ScrapeError>>>,
}

impl Default for MockGalleryScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGalleryScraper {
    /// Create a new mock scraper that knows no galleries.
    pub fn new() -> Self {
        Self {
            galleries: Arc::new(RwLock::new(HashMap::new())),
            pages: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            failing_page: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Make a gallery available.
    pub async fn add_gallery(&self, meta: GalleryMetadata) {
        self.galleries.write().await.insert(meta.id, meta);
    }

    /// Override the image URL served for one page.
    pub async fn set_page_image(&self, id: u64, page: u32, url: &str) {
        self.pages.write().await.insert((id, page), url.to_string());
    }

    /// Make every fetch of `page` fail with a 500.
    pub async fn fail_on_page(&self, page: u32) {
        *self.failing_page.write().await = Some(page);
    }

    /// Make the next metadata fetch fail.
    pub async fn set_next_error(&self, error: ScrapeError) {
        *self.next_error.write().await = Some(error);
    }

    /// Requests made so far, in order.
    pub async fn recorded(&self) -> Vec<RecordedScrape> {
        self.requests.read().await.clone()
    }

    /// Default image URL for a page.
    pub fn page_image_url(id: u64, page: u32) -> String {
        format!("https://i.example/galleries/{}/{}.jpg", id, page)
    }
}

#[async_trait]
impl GalleryScraper for MockGalleryScraper {
    async fn fetch_metadata(&self, id: u64) -> Result<GalleryMetadata, ScrapeError> {
        self.requests
            .write()
            .await
            .push(RecordedScrape::Metadata { id });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.galleries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                status: 404,
                url: format!("mock://g/{}/", id),
            })
    }

    async fn fetch_page_image(&self, id: u64, page: u32) -> Result<String, ScrapeError> {
        self.requests
            .write()
            .await
            .push(RecordedScrape::Page { id, page });

        if *self.failing_page.read().await == Some(page) {
            return Err(ScrapeError::Status {
                status: 500,
                url: format!("mock://g/{}/{}", id, page),
            });
        }

        Ok(self
            .pages
            .read()
            .await
            .get(&(id, page))
            .cloned()
            .unwrap_or_else(|| Self::page_image_url(id, page)))
    }
}
