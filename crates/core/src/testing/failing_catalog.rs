//! Catalog store whose every operation fails.

use crate::catalog::{
    CatalogEntry, CatalogError, CatalogSearchQuery, CatalogStats, CatalogStore, FacetKind,
    FacetListing, GalleryRoute, NewGallery, PageRoute, SearchRows, StoredGallery,
};

/// A [`CatalogStore`] that answers every call with a database error.
///
/// Used to check that readers degrade instead of propagating failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCatalog;

impl FailingCatalog {
    fn error<T>() -> Result<T, CatalogError> {
        Err(CatalogError::Database("simulated store failure".to_string()))
    }
}

impl CatalogStore for FailingCatalog {
    fn find_id(&self, _external_id: u64) -> Result<Option<i64>, CatalogError> {
        Self::error()
    }

    fn insert_gallery(&self, _gallery: &NewGallery) -> Result<StoredGallery, CatalogError> {
        Self::error()
    }

    fn remove_gallery(&self, _external_id: u64) -> Result<(), CatalogError> {
        Self::error()
    }

    fn get(&self, _external_id: u64) -> Result<CatalogEntry, CatalogError> {
        Self::error()
    }

    fn search(&self, _query: &CatalogSearchQuery) -> Result<SearchRows, CatalogError> {
        Self::error()
    }

    fn list_facets(&self, _kind: FacetKind, _limit: u32) -> Result<Vec<FacetListing>, CatalogError> {
        Self::error()
    }

    fn list_gallery_routes(&self, _limit: u32) -> Result<Vec<GalleryRoute>, CatalogError> {
        Self::error()
    }

    fn list_page_routes(&self, _offset: u64, _limit: u32) -> Result<Vec<PageRoute>, CatalogError> {
        Self::error()
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        Self::error()
    }
}
