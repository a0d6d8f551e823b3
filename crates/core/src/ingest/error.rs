use thiserror::Error;

use crate::catalog::CatalogError;
use crate::scrape::ScrapeError;

/// Errors of the ingestion and removal pipeline.
///
/// The `Display` text is what API callers see.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid `id`.")]
    InvalidId,

    #[error("Failed to fetch gallery: {0}")]
    Fetch(#[from] ScrapeError),

    #[error("Post contains blacklisted tag(s): {}", .0.join(", "))]
    Blacklisted(Vec<String>),

    #[error("Could not generate valid slug from title")]
    InvalidSlug,

    #[error("Gallery with ID {0} already exists")]
    Duplicate(u64),

    #[error("Gallery with ID {0} not found")]
    NotFound(u64),

    #[error("Catalog error: {0}")]
    Store(CatalogError),
}

impl From<CatalogError> for IngestError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Duplicate(id) => IngestError::Duplicate(id),
            CatalogError::NotFound(id) => IngestError::NotFound(id),
            other => IngestError::Store(other),
        }
    }
}

impl IngestError {
    /// Short label used for the `result` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::InvalidId => "invalid_id",
            IngestError::Fetch(_) => "fetch_failed",
            IngestError::Blacklisted(_) => "blacklisted",
            IngestError::InvalidSlug => "invalid_slug",
            IngestError::Duplicate(_) => "duplicate",
            IngestError::NotFound(_) => "not_found",
            IngestError::Store(_) => "store_failed",
        }
    }
}
