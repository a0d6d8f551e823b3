use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::catalog::FacetKind;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shelf.db")
}

/// Upstream gallery site configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// Upstream site root (e.g., "https://nhentai.net")
    #[serde(default = "default_scraper_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Prefix of the title synthesized when a gallery page has none
    #[serde(default = "default_fallback_title_prefix")]
    pub fallback_title_prefix: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_scraper_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            fallback_title_prefix: default_fallback_title_prefix(),
        }
    }
}

fn default_scraper_base_url() -> String {
    "https://nhentai.net".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_fallback_title_prefix() -> String {
    "nhentai".to_string()
}

/// Public site configuration, used to build canonical URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Public root URL without trailing slash
    #[serde(default = "default_site_url")]
    pub url: String,
    /// Brand name appended to page titles
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Open Graph image for search pages (defaults to `<url>/images/search-og.jpg`)
    #[serde(default)]
    pub og_image: Option<String>,
    /// First path segment of gallery routes (`/<gallery_path>/<slug>`)
    #[serde(default = "default_gallery_path")]
    pub gallery_path: String,
}

impl SiteConfig {
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn og_image(&self) -> String {
        self.og_image
            .clone()
            .unwrap_or_else(|| format!("{}/images/search-og.jpg", self.base_url()))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            name: default_site_name(),
            og_image: None,
            gallery_path: default_gallery_path(),
        }
    }
}

fn default_site_url() -> String {
    "https://nhentai.pics".to_string()
}

fn default_site_name() -> String {
    "NHentai".to_string()
}

fn default_gallery_path() -> String {
    "hentai".to_string()
}

/// Size limits for generated sitemap documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SitemapConfig {
    /// Per-kind facet limits for the browse sitemap.
    #[serde(default)]
    pub browse_limits: BrowseLimits,
    /// Facets per kind considered by the paginated browse sitemap.
    #[serde(default = "default_paginated_facet_limit")]
    pub paginated_facet_limit: u32,
    /// Page size of the public browse pages.
    #[serde(default = "default_browse_page_size")]
    pub browse_page_size: u32,
    /// Highest browse page listed per facet.
    #[serde(default = "default_max_browse_pages")]
    pub max_browse_pages: u32,
    /// Galleries listed by the gallery sitemap (newest first).
    #[serde(default = "default_gallery_limit")]
    pub gallery_limit: u32,
    /// URLs per gallery-page sitemap chunk.
    #[serde(default = "default_urls_per_chunk")]
    pub urls_per_chunk: u32,
    /// Facets per kind in the combined sitemap.
    #[serde(default = "default_combined_facet_limit")]
    pub combined_facet_limit: u32,
    /// Galleries in the combined sitemap.
    #[serde(default = "default_combined_gallery_limit")]
    pub combined_gallery_limit: u32,
    /// Galleries whose first reading page is listed in the combined sitemap.
    #[serde(default = "default_combined_reading_limit")]
    pub combined_reading_limit: u32,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            browse_limits: BrowseLimits::default(),
            paginated_facet_limit: default_paginated_facet_limit(),
            browse_page_size: default_browse_page_size(),
            max_browse_pages: default_max_browse_pages(),
            gallery_limit: default_gallery_limit(),
            urls_per_chunk: default_urls_per_chunk(),
            combined_facet_limit: default_combined_facet_limit(),
            combined_gallery_limit: default_combined_gallery_limit(),
            combined_reading_limit: default_combined_reading_limit(),
        }
    }
}

fn default_paginated_facet_limit() -> u32 {
    1000
}

fn default_browse_page_size() -> u32 {
    10
}

fn default_max_browse_pages() -> u32 {
    100
}

fn default_gallery_limit() -> u32 {
    25_000
}

fn default_urls_per_chunk() -> u32 {
    50_000
}

fn default_combined_facet_limit() -> u32 {
    1000
}

fn default_combined_gallery_limit() -> u32 {
    10_000
}

fn default_combined_reading_limit() -> u32 {
    1000
}

/// Facet count limits of the browse sitemap, one per kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowseLimits {
    #[serde(default = "default_tag_limit")]
    pub tags: u32,
    #[serde(default = "default_artist_limit")]
    pub artists: u32,
    #[serde(default = "default_group_limit")]
    pub groups: u32,
    #[serde(default = "default_parody_limit")]
    pub parodies: u32,
    #[serde(default = "default_language_limit")]
    pub languages: u32,
    #[serde(default = "default_category_limit")]
    pub categories: u32,
    #[serde(default = "default_character_limit")]
    pub characters: u32,
}

impl BrowseLimits {
    pub fn for_kind(&self, kind: FacetKind) -> u32 {
        match kind {
            FacetKind::Tag => self.tags,
            FacetKind::Artist => self.artists,
            FacetKind::Group => self.groups,
            FacetKind::Parody => self.parodies,
            FacetKind::Language => self.languages,
            FacetKind::Category => self.categories,
            FacetKind::Character => self.characters,
        }
    }
}

impl Default for BrowseLimits {
    fn default() -> Self {
        Self {
            tags: default_tag_limit(),
            artists: default_artist_limit(),
            groups: default_group_limit(),
            parodies: default_parody_limit(),
            languages: default_language_limit(),
            categories: default_category_limit(),
            characters: default_character_limit(),
        }
    }
}

fn default_tag_limit() -> u32 {
    5000
}

fn default_artist_limit() -> u32 {
    2000
}

fn default_group_limit() -> u32 {
    1000
}

fn default_parody_limit() -> u32 {
    3000
}

fn default_language_limit() -> u32 {
    50
}

fn default_category_limit() -> u32 {
    100
}

fn default_character_limit() -> u32 {
    3000
}
