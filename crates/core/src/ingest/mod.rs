//! Gallery ingestion and removal.
//!
//! [`Ingestor::ingest`] runs the whole pipeline for one external id:
//! scrape metadata, reject blacklisted tags, derive the slug, refuse
//! duplicates, scrape every reading page in order, then hand the result to
//! the catalog in a single write. Every step before that write fails fast,
//! so a rejected gallery leaves no trace in the store.

mod error;

pub use error::IngestError;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::blacklist::find_blacklisted;
use crate::catalog::{CatalogStore, FacetLinkFailure, NewGallery};
use crate::metrics;
use crate::scrape::GalleryScraper;
use crate::slug::normalize_slug;

/// Summary of a successful ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    /// Internal catalog id of the new entry.
    pub id: i64,
    pub external_id: u64,
    pub slug: String,
    pub pages: usize,
    pub linked_facets: usize,
    pub facet_failures: Vec<FacetLinkFailure>,
}

/// Runs ingestion and removal against a catalog and a scraper.
pub struct Ingestor {
    catalog: Arc<dyn CatalogStore>,
    scraper: Arc<dyn GalleryScraper>,
}

impl Ingestor {
    pub fn new(catalog: Arc<dyn CatalogStore>, scraper: Arc<dyn GalleryScraper>) -> Self {
        Self { catalog, scraper }
    }

    /// Scrape gallery `external_id` and store it unless it is rejected.
    pub async fn ingest(
        &self,
        external_id: u64,
        blacklist: &[String],
    ) -> Result<IngestOutcome, IngestError> {
        let result = self.run_ingest(external_id, blacklist).await;

        let label = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::INGESTIONS_TOTAL.with_label_values(&[label]).inc();

        result
    }

    async fn run_ingest(
        &self,
        external_id: u64,
        blacklist: &[String],
    ) -> Result<IngestOutcome, IngestError> {
        if external_id == 0 {
            return Err(IngestError::InvalidId);
        }

        let meta = self.scraper.fetch_metadata(external_id).await?;

        let blocked = find_blacklisted(meta.tags(), blacklist);
        if !blocked.is_empty() {
            info!(
                gallery_id = external_id,
                tags = ?blocked,
                "Rejected gallery with blacklisted tags"
            );
            return Err(IngestError::Blacklisted(blocked));
        }

        let slug = normalize_slug(&meta.title);
        if slug.is_empty() {
            return Err(IngestError::InvalidSlug);
        }

        if self.catalog.exists(external_id)? {
            return Err(IngestError::Duplicate(external_id));
        }

        let mut pages = Vec::with_capacity(meta.total_pages as usize);
        for page in 1..=meta.total_pages {
            let image_url = self.scraper.fetch_page_image(external_id, page).await?;
            if image_url.is_empty() {
                warn!(gallery_id = external_id, page, "Reading page has no image");
            }
            pages.push(image_url);
        }

        let gallery = NewGallery {
            external_id,
            title: meta.title,
            feature_image_url: meta.feature_image_url,
            slug,
            pages,
            facets: meta.facets,
        };

        let stored = self.catalog.insert_gallery(&gallery)?;

        for failure in &stored.facet_failures {
            warn!(
                gallery_id = external_id,
                kind = %failure.kind,
                name = %failure.name,
                error = %failure.reason,
                "Failed to link facet"
            );
            metrics::FACET_LINK_FAILURES
                .with_label_values(&[failure.kind.as_str()])
                .inc();
        }

        info!(
            gallery_id = external_id,
            id = stored.id,
            slug = %stored.slug,
            pages = gallery.pages.len(),
            facets = stored.linked_facets,
            "Ingested gallery"
        );

        Ok(IngestOutcome {
            id: stored.id,
            external_id,
            slug: stored.slug,
            pages: gallery.pages.len(),
            linked_facets: stored.linked_facets,
            facet_failures: stored.facet_failures,
        })
    }

    /// Remove a stored gallery with its pages, facet links and slug.
    pub fn remove(&self, external_id: u64) -> Result<(), IngestError> {
        let result = self.catalog.remove_gallery(external_id).map_err(IngestError::from);

        let label = match &result {
            Ok(()) => "success",
            Err(e) => e.kind(),
        };
        metrics::DELETIONS_TOTAL.with_label_values(&[label]).inc();

        if result.is_ok() {
            info!(gallery_id = external_id, "Removed gallery");
        }
        result
    }
}
