//! Types for the gallery catalog store.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the seven classification dimensions linked to catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Tag,
    Artist,
    Group,
    Parody,
    Language,
    Category,
    Character,
}

impl FacetKind {
    /// Every kind, in the order facets are linked during ingestion.
    pub const ALL: [FacetKind; 7] = [
        FacetKind::Tag,
        FacetKind::Artist,
        FacetKind::Group,
        FacetKind::Parody,
        FacetKind::Language,
        FacetKind::Category,
        FacetKind::Character,
    ];

    /// Singular name (`tag`, `artist`, ...). Also the table-name suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKind::Tag => "tag",
            FacetKind::Artist => "artist",
            FacetKind::Group => "group",
            FacetKind::Parody => "parody",
            FacetKind::Language => "language",
            FacetKind::Category => "category",
            FacetKind::Character => "character",
        }
    }

    /// Plural name used in public routes (`/browse/tags/...`, `/p/tags`).
    pub fn plural(&self) -> &'static str {
        match self {
            FacetKind::Tag => "tags",
            FacetKind::Artist => "artists",
            FacetKind::Group => "groups",
            FacetKind::Parody => "parodies",
            FacetKind::Language => "languages",
            FacetKind::Category => "categories",
            FacetKind::Character => "characters",
        }
    }

    /// Resolve a scraped category label such as `"Tags:"` or `"artist"`.
    ///
    /// Matching is case-insensitive and accepts singular and plural forms.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.replace(':', "");
        let label = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| label == kind.as_str() || label == kind.plural())
    }

    pub(crate) fn facet_table(&self) -> String {
        format!("facet_{}", self.as_str())
    }

    pub(crate) fn link_table(&self) -> String {
        format!("gallery_{}", self.as_str())
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facet names grouped by kind.
///
/// Kinds without names are simply absent; [`FacetSet::names`] returns an
/// empty slice for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSet(BTreeMap<FacetKind, Vec<String>>);

impl FacetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append names to a kind, keeping insertion order.
    pub fn extend<I, S>(&mut self, kind: FacetKind, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.0.entry(kind).or_default();
        entry.extend(names.into_iter().map(Into::into));
    }

    /// Builder-style variant of [`FacetSet::extend`].
    pub fn with<I, S>(mut self, kind: FacetKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend(kind, names);
        self
    }

    pub fn names(&self, kind: FacetKind) -> &[String] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Total number of names across all kinds.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// A scraped gallery ready to be written to the catalog.
#[derive(Debug, Clone)]
pub struct NewGallery {
    pub external_id: u64,
    pub title: String,
    pub feature_image_url: String,
    pub slug: String,
    /// Image URL per page, page 1 first.
    pub pages: Vec<String>,
    pub facets: FacetSet,
}

/// A facet name that could not be linked to a new entry.
#[derive(Debug, Clone, Serialize)]
pub struct FacetLinkFailure {
    pub kind: FacetKind,
    pub name: String,
    pub reason: String,
}

/// Result of a successful gallery insert.
#[derive(Debug, Clone)]
pub struct StoredGallery {
    /// Internal (store-assigned) identifier.
    pub id: i64,
    pub slug: String,
    pub linked_facets: usize,
    pub facet_failures: Vec<FacetLinkFailure>,
}

/// One page of a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_number: u32,
    pub image_url: String,
}

/// A stored catalog entry with everything it owns.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub external_id: u64,
    pub title: String,
    pub feature_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub pages: Vec<PageRecord>,
    pub facets: FacetSet,
}

/// Paginated substring query against titles and facet names.
#[derive(Debug, Clone)]
pub struct CatalogSearchQuery {
    pub text: String,
    pub offset: u32,
    pub limit: u32,
}

/// A matching entry as returned by [`super::CatalogStore::search`].
#[derive(Debug, Clone)]
pub struct SearchRow {
    pub id: i64,
    pub title: String,
    pub feature_image_url: String,
    pub slug: Option<String>,
    /// Linked facet names; artists keep their link order.
    pub facets: FacetSet,
}

/// A page of search rows plus the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct SearchRows {
    pub rows: Vec<SearchRow>,
    pub total: u64,
}

/// A facet with its slug and the number of entries linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetListing {
    pub name: String,
    pub slug: String,
    pub gallery_count: u64,
}

/// Slug and creation time of an entry, for gallery routes.
#[derive(Debug, Clone)]
pub struct GalleryRoute {
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// One reading page route.
#[derive(Debug, Clone)]
pub struct PageRoute {
    pub slug: String,
    pub page_number: u32,
    pub created_at: DateTime<Utc>,
}

/// Catalog statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_entries: u64,
    pub total_pages: u64,
    /// Facet rows per kind.
    pub facets: BTreeMap<FacetKind, u64>,
    /// Entry-facet links across all kinds.
    pub total_links: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Gallery with ID {0} not found")]
    NotFound(u64),

    #[error("Gallery with ID {0} already exists")]
    Duplicate(u64),

    #[error("Slug already in use: {0}")]
    SlugConflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}
