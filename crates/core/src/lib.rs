pub mod blacklist;
pub mod catalog;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod scrape;
pub mod search;
pub mod sitemap;
pub mod slug;
pub mod testing;

pub use blacklist::find_blacklisted;
pub use catalog::{
    CatalogEntry, CatalogError, CatalogSearchQuery, CatalogStats, CatalogStore, FacetKind,
    FacetLinkFailure, FacetListing, FacetSet, NewGallery, PageRecord, SqliteCatalog,
    StoredGallery,
};
pub use config::{
    load_config, load_config_from_str, validate_config, BrowseLimits, Config, ConfigError,
    DatabaseConfig, ScraperConfig, ServerConfig, SiteConfig, SitemapConfig,
};
pub use ingest::{IngestError, IngestOutcome, Ingestor};
pub use scrape::{GalleryMetadata, GalleryScraper, HttpGalleryScraper, ScrapeError};
pub use search::{SearchHit, SearchMeta, SearchPage, SearchService};
pub use sitemap::{SitemapBuilder, SitemapDocument};
pub use slug::normalize_slug;
