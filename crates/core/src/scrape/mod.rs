//! Gallery scraping from the upstream site.
//!
//! [`HttpGalleryScraper`] fetches gallery and reading pages over HTTP; the
//! HTML is turned into [`GalleryMetadata`] by the pure functions in
//! [`parse`], which never fail on missing markup and fall back to empty
//! values instead.

mod http;
pub mod parse;
mod types;

pub use http::HttpGalleryScraper;
pub use parse::{parse_gallery_html, parse_page_image};
pub use types::GalleryMetadata;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while scraping the upstream site.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network failure or timeout.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned {status} for {url}")]
    Status { status: u16, url: String },

    /// A CSS selector could not be compiled.
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Source of gallery metadata and page images.
#[async_trait]
pub trait GalleryScraper: Send + Sync {
    /// Fetch and parse the metadata page of a gallery.
    async fn fetch_metadata(&self, id: u64) -> Result<GalleryMetadata, ScrapeError>;

    /// Fetch reading page `page` (1-based) and return its image URL.
    ///
    /// A page without a recognizable image yields `""`.
    async fn fetch_page_image(&self, id: u64, page: u32) -> Result<String, ScrapeError>;
}
