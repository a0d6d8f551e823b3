//! Gallery catalog - the relational store behind ingestion, search and sitemaps.
//!
//! An entry owns its pages, its slug and its facet links; facets themselves
//! are shared between entries and never deleted.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

/// Trait for catalog storage.
pub trait CatalogStore: Send + Sync {
    /// Look up the internal id of an entry by its external gallery id.
    fn find_id(&self, external_id: u64) -> Result<Option<i64>, CatalogError>;

    /// Check if an entry with this external id exists.
    fn exists(&self, external_id: u64) -> Result<bool, CatalogError> {
        Ok(self.find_id(external_id)?.is_some())
    }

    /// Write an entry, its slug, its pages and its facet links.
    ///
    /// Entry, slug and pages are all-or-nothing. Each facet name is linked
    /// independently; names that fail are reported in
    /// [`StoredGallery::facet_failures`] and do not fail the insert.
    fn insert_gallery(&self, gallery: &NewGallery) -> Result<StoredGallery, CatalogError>;

    /// Remove an entry with its pages, facet links and slug.
    fn remove_gallery(&self, external_id: u64) -> Result<(), CatalogError>;

    /// Get a stored entry by external id.
    fn get(&self, external_id: u64) -> Result<CatalogEntry, CatalogError>;

    /// Case-insensitive substring search over titles and facet names.
    fn search(&self, query: &CatalogSearchQuery) -> Result<SearchRows, CatalogError>;

    /// List facets of a kind that have a non-empty slug.
    fn list_facets(&self, kind: FacetKind, limit: u32) -> Result<Vec<FacetListing>, CatalogError>;

    /// List gallery routes, newest first.
    fn list_gallery_routes(&self, limit: u32) -> Result<Vec<GalleryRoute>, CatalogError>;

    /// List reading page routes ordered by entry then page number.
    fn list_page_routes(&self, offset: u64, limit: u32) -> Result<Vec<PageRoute>, CatalogError>;

    /// Get catalog statistics.
    fn stats(&self) -> Result<CatalogStats, CatalogError>;
}
