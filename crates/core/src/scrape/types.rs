use serde::{Deserialize, Serialize};

use crate::catalog::{FacetKind, FacetSet};

/// Metadata of a gallery as scraped from its landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryMetadata {
    pub id: u64,
    pub title: String,
    /// Cover image URL, `""` when the page has none.
    pub feature_image_url: String,
    /// Number of thumbnails, i.e. reading pages.
    pub total_pages: u32,
    pub facets: FacetSet,
}

impl GalleryMetadata {
    pub fn tags(&self) -> &[String] {
        self.facets.names(FacetKind::Tag)
    }
}
