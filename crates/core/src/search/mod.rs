//! Paginated catalog search with SEO metadata.

mod meta;

pub use meta::SearchMeta;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use crate::catalog::{CatalogSearchQuery, CatalogStore, FacetKind, SearchRow};
use crate::config::SiteConfig;
use crate::metrics;
use meta::MetaBuilder;

/// Results per search page.
pub const PAGE_SIZE: u32 = 10;

/// Public path of the search page.
pub const SEARCH_PATH: &str = "/search";

/// Parse a `page` query parameter; anything but a positive integer is page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Author {
    pub name: String,
}

/// One search result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    /// `""` when the entry has no slug.
    pub slug: String,
    pub feature_image: String,
    /// First linked artist, or "Unknown".
    pub author: Author,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub characters: Vec<String>,
    pub groups: Vec<String>,
    pub languages: Vec<String>,
    pub parodies: Vec<String>,
}

impl From<SearchRow> for SearchHit {
    fn from(row: SearchRow) -> Self {
        let names = |kind: FacetKind| row.facets.names(kind).to_vec();
        let author = Author {
            name: row
                .facets
                .names(FacetKind::Artist)
                .first()
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
        };

        SearchHit {
            id: row.id,
            tags: names(FacetKind::Tag),
            categories: names(FacetKind::Category),
            characters: names(FacetKind::Character),
            groups: names(FacetKind::Group),
            languages: names(FacetKind::Language),
            parodies: names(FacetKind::Parody),
            author,
            title: row.title,
            slug: row.slug.unwrap_or_default(),
            feature_image: row.feature_image_url,
        }
    }
}

/// A page of search results as served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub query: String,
    pub galleries: Vec<SearchHit>,
    pub page: u32,
    pub total_pages: u32,
    pub meta: SearchMeta,
}

/// Runs search queries against the catalog.
pub struct SearchService {
    catalog: Arc<dyn CatalogStore>,
    site: SiteConfig,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn CatalogStore>, site: SiteConfig) -> Self {
        Self { catalog, site }
    }

    /// Search titles and facet names for `query`, returning page `page`.
    ///
    /// A blank query returns an empty first page without touching the
    /// catalog. A catalog failure is logged and reported as "no results".
    pub fn search(&self, query: &str, page: u32) -> SearchPage {
        let query = query.trim();
        let page = page.max(1);
        let meta = MetaBuilder::new(&self.site, SEARCH_PATH);

        if query.is_empty() {
            metrics::SEARCH_QUERIES
                .with_label_values(&["empty_query"])
                .inc();
            return SearchPage {
                query: String::new(),
                galleries: Vec::new(),
                page: 1,
                total_pages: 1,
                meta: meta.empty_query(),
            };
        }

        let request = CatalogSearchQuery {
            text: query.to_string(),
            offset: (page - 1).saturating_mul(PAGE_SIZE),
            limit: PAGE_SIZE,
        };

        let rows = match self.catalog.search(&request) {
            Ok(rows) => rows,
            Err(e) => {
                error!(query = %query, page, error = %e, "Search failed");
                metrics::SEARCH_QUERIES
                    .with_label_values(&["store_failed"])
                    .inc();
                return SearchPage {
                    query: query.to_string(),
                    galleries: Vec::new(),
                    page,
                    total_pages: 1,
                    meta: meta.unavailable(query),
                };
            }
        };

        let total = rows.total;
        let total_pages = total_pages(total);
        let galleries: Vec<SearchHit> = rows.rows.into_iter().map(SearchHit::from).collect();

        debug!(query = %query, page, total, "Search completed");
        metrics::SEARCH_QUERIES
            .with_label_values(&[if total > 0 { "hits" } else { "no_hits" }])
            .inc();

        SearchPage {
            query: query.to_string(),
            meta: meta.results(query, page, total_pages, total, &galleries),
            galleries,
            page,
            total_pages,
        }
    }
}

fn total_pages(total: u64) -> u32 {
    if total == 0 {
        1
    } else {
        total.div_ceil(PAGE_SIZE as u64).min(u32::MAX as u64) as u32
    }
}
