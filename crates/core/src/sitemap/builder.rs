//! Sitemap documents built from catalog contents.

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, warn};

use super::xml::{render_index, render_urlset, ChangeFreq, SitemapRef, SitemapUrl};
use crate::catalog::{CatalogError, CatalogStore, FacetKind};
use crate::config::{SitemapConfig, SiteConfig};
use crate::metrics;

/// Facet kinds in the order they appear in sitemaps.
const KIND_ORDER: [FacetKind; 7] = [
    FacetKind::Tag,
    FacetKind::Artist,
    FacetKind::Category,
    FacetKind::Parody,
    FacetKind::Character,
    FacetKind::Language,
    FacetKind::Group,
];

/// Kinds whose first browse pages are listed in the browse sitemap.
const POPULAR_KINDS: [FacetKind; 3] = [FacetKind::Tag, FacetKind::Artist, FacetKind::Parody];

/// Highest browse page listed for popular kinds in the browse sitemap.
const POPULAR_MAX_PAGE: u32 = 5;

/// Cache lifetime of documents produced after a store failure.
const DEGRADED_MAX_AGE: u32 = 300;

/// A rendered sitemap with its cache lifetime.
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    pub body: String,
    /// `Cache-Control: max-age` in seconds.
    pub max_age: u32,
    /// Set when the catalog failed and a fallback document was rendered.
    pub degraded: bool,
}

/// Builds every sitemap document of the site.
pub struct SitemapBuilder {
    catalog: Arc<dyn CatalogStore>,
    site: SiteConfig,
    limits: SitemapConfig,
}

impl SitemapBuilder {
    pub fn new(catalog: Arc<dyn CatalogStore>, site: SiteConfig, limits: SitemapConfig) -> Self {
        Self {
            catalog,
            site,
            limits,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.site.base_url(), path)
    }

    fn gallery_url(&self, slug: &str) -> String {
        format!("{}/{}/{}", self.site.base_url(), self.site.gallery_path, slug)
    }

    fn browse_url(&self, kind: FacetKind, slug: &str) -> String {
        format!("{}/browse/{}/{}", self.site.base_url(), kind.plural(), slug)
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn homepage(&self) -> SitemapUrl {
        SitemapUrl::new(self.url("/"))
            .lastmod(Self::today())
            .changefreq(ChangeFreq::Daily)
            .priority(1.0)
    }

    /// Homepage, browse root and the per-kind listing pages.
    fn static_urls(&self, dated_listings: bool) -> Vec<SitemapUrl> {
        let today = Self::today();
        let mut urls = vec![
            self.homepage(),
            SitemapUrl::new(self.url("/browse"))
                .lastmod(today)
                .changefreq(ChangeFreq::Daily)
                .priority(0.8),
        ];

        for kind in KIND_ORDER {
            let mut url = SitemapUrl::new(self.url(&format!("/p/{}", kind.plural())))
                .changefreq(ChangeFreq::Weekly)
                .priority(0.7);
            if dated_listings {
                url = url.lastmod(today);
            }
            urls.push(url);
        }

        urls
    }

    fn finish(
        &self,
        document: &str,
        started: Instant,
        urls: Vec<SitemapUrl>,
        max_age: u32,
        degraded: bool,
    ) -> SitemapDocument {
        let result = if degraded { "degraded" } else { "ok" };
        metrics::SITEMAP_DOCUMENTS
            .with_label_values(&[document, result])
            .inc();
        metrics::SITEMAP_DURATION
            .with_label_values(&[document])
            .observe(started.elapsed().as_secs_f64());
        debug!(document, urls = urls.len(), degraded, "Generated sitemap");

        SitemapDocument {
            body: render_urlset(&urls),
            max_age,
            degraded,
        }
    }

    /// Sitemap index listing the sub-sitemaps and every gallery-page chunk.
    pub fn index(&self) -> SitemapDocument {
        let started = Instant::now();
        let today = Self::today();

        let mut paths: Vec<String> = [
            "/sitemap-static.xml",
            "/sitemap-browse.xml",
            "/sitemap-browse-paginated.xml",
            "/sitemap-galleries.xml",
        ]
        .iter()
        .map(|path| path.to_string())
        .collect();

        let mut degraded = false;
        match self.catalog.stats() {
            Ok(stats) => {
                let chunks = stats
                    .total_pages
                    .div_ceil(self.limits.urls_per_chunk.max(1) as u64);
                for index in 0..chunks {
                    paths.push(format!("/sitemap-gallery-pages/{}.xml", index));
                }
            }
            Err(e) => {
                warn!(error = %e, "Could not count pages for sitemap index");
                degraded = true;
            }
        }

        let sitemaps: Vec<SitemapRef> = paths
            .iter()
            .map(|path| SitemapRef {
                loc: self.url(path),
                lastmod: today,
            })
            .collect();

        metrics::SITEMAP_DOCUMENTS
            .with_label_values(&["index", if degraded { "degraded" } else { "ok" }])
            .inc();
        metrics::SITEMAP_DURATION
            .with_label_values(&["index"])
            .observe(started.elapsed().as_secs_f64());

        SitemapDocument {
            body: render_index(&sitemaps),
            max_age: 3600,
            degraded,
        }
    }

    /// Fixed pages of the site.
    pub fn static_pages(&self) -> SitemapDocument {
        let started = Instant::now();
        let urls = self.static_urls(false);
        self.finish("static", started, urls, 86_400, false)
    }

    /// First browse page of every facet, plus pages 2-5 for popular kinds.
    ///
    /// A kind whose listing fails is left out.
    pub fn browse(&self) -> SitemapDocument {
        let started = Instant::now();
        let mut urls = Vec::new();

        for kind in KIND_ORDER {
            let limit = self.limits.browse_limits.for_kind(kind);
            let facets = match self.catalog.list_facets(kind, limit) {
                Ok(facets) => facets,
                Err(e) => {
                    warn!(kind = %kind, error = %e, "Skipping facet kind in browse sitemap");
                    continue;
                }
            };

            for facet in facets {
                let loc = self.browse_url(kind, &facet.slug);
                if POPULAR_KINDS.contains(&kind) {
                    urls.push(
                        SitemapUrl::new(loc.clone())
                            .changefreq(ChangeFreq::Weekly)
                            .priority(0.6),
                    );
                    for page in 2..=POPULAR_MAX_PAGE {
                        urls.push(
                            SitemapUrl::new(format!("{}?page={}", loc, page))
                                .changefreq(ChangeFreq::Weekly)
                                .priority(0.4),
                        );
                    }
                } else {
                    urls.push(
                        SitemapUrl::new(loc)
                            .changefreq(ChangeFreq::Weekly)
                            .priority(0.6),
                    );
                }
            }
        }

        self.finish("browse", started, urls, 21_600, false)
    }

    /// Browse pages 2..N of facets with more than one page of galleries.
    pub fn browse_paginated(&self) -> SitemapDocument {
        let started = Instant::now();

        match self.paginated_urls() {
            Ok(urls) => self.finish("browse_paginated", started, urls, 86_400, false),
            Err(e) => {
                error!(error = %e, "Paginated browse sitemap failed");
                self.finish("browse_paginated", started, Vec::new(), 3600, true)
            }
        }
    }

    fn paginated_urls(&self) -> Result<Vec<SitemapUrl>, CatalogError> {
        let today = Self::today();
        let page_size = self.limits.browse_page_size.max(1) as u64;
        let mut urls = Vec::new();

        for kind in KIND_ORDER {
            let facets = self
                .catalog
                .list_facets(kind, self.limits.paginated_facet_limit)?;

            for facet in facets {
                if facet.gallery_count <= page_size {
                    continue;
                }
                let pages = facet
                    .gallery_count
                    .div_ceil(page_size)
                    .min(self.limits.max_browse_pages as u64);
                let loc = self.browse_url(kind, &facet.slug);

                for page in 2..=pages {
                    urls.push(
                        SitemapUrl::new(format!("{}?page={}", loc, page))
                            .lastmod(today)
                            .changefreq(ChangeFreq::Weekly)
                            .priority(0.5),
                    );
                }
            }
        }

        Ok(urls)
    }

    /// Gallery landing pages and their first reading page, newest first.
    pub fn galleries(&self) -> SitemapDocument {
        let started = Instant::now();

        match self.catalog.list_gallery_routes(self.limits.gallery_limit) {
            Ok(routes) => {
                let mut urls = Vec::with_capacity(routes.len() * 2);
                for route in routes {
                    let loc = self.gallery_url(&route.slug);
                    let lastmod = route.created_at.date_naive();
                    urls.push(
                        SitemapUrl::new(loc.clone())
                            .lastmod(lastmod)
                            .changefreq(ChangeFreq::Monthly)
                            .priority(0.5),
                    );
                    urls.push(
                        SitemapUrl::new(format!("{}/1", loc))
                            .lastmod(lastmod)
                            .changefreq(ChangeFreq::Monthly)
                            .priority(0.4),
                    );
                }
                self.finish("galleries", started, urls, 43_200, false)
            }
            Err(e) => {
                error!(error = %e, "Gallery sitemap failed");
                let urls = vec![self.homepage()];
                self.finish("galleries", started, urls, DEGRADED_MAX_AGE, true)
            }
        }
    }

    /// Reading pages of chunk `index`.
    pub fn gallery_pages(&self, index: u64) -> SitemapDocument {
        let started = Instant::now();
        let chunk = self.limits.urls_per_chunk;
        let Some(offset) = index.checked_mul(chunk as u64) else {
            debug!(index, "Chunk index beyond any catalog size");
            return self.finish("gallery_pages", started, Vec::new(), 3600, false);
        };

        match self.catalog.list_page_routes(offset, chunk) {
            Ok(routes) => {
                let urls = routes
                    .into_iter()
                    .map(|route| {
                        SitemapUrl::new(format!(
                            "{}/{}",
                            self.gallery_url(&route.slug),
                            route.page_number
                        ))
                        .lastmod(route.created_at.date_naive())
                        .changefreq(ChangeFreq::Monthly)
                        .priority(0.4)
                    })
                    .collect();
                self.finish("gallery_pages", started, urls, 3600, false)
            }
            Err(e) => {
                error!(index, error = %e, "Gallery page sitemap failed");
                self.finish("gallery_pages", started, Vec::new(), DEGRADED_MAX_AGE, true)
            }
        }
    }

    /// Single sitemap covering static pages, browse pages and galleries.
    pub fn combined(&self) -> SitemapDocument {
        let started = Instant::now();

        match self.combined_urls() {
            Ok(urls) => self.finish("combined", started, urls, 3600, false),
            Err(e) => {
                error!(error = %e, "Combined sitemap failed");
                let urls = vec![self.homepage()];
                self.finish("combined", started, urls, DEGRADED_MAX_AGE, true)
            }
        }
    }

    fn combined_urls(&self) -> Result<Vec<SitemapUrl>, CatalogError> {
        let today = Self::today();
        let mut urls = self.static_urls(true);

        for kind in KIND_ORDER {
            for facet in self
                .catalog
                .list_facets(kind, self.limits.combined_facet_limit)?
            {
                urls.push(
                    SitemapUrl::new(self.browse_url(kind, &facet.slug))
                        .lastmod(today)
                        .changefreq(ChangeFreq::Weekly)
                        .priority(0.6),
                );
            }
        }

        let routes = self
            .catalog
            .list_gallery_routes(self.limits.combined_gallery_limit)?;

        for route in &routes {
            urls.push(
                SitemapUrl::new(self.gallery_url(&route.slug))
                    .lastmod(route.created_at.date_naive())
                    .changefreq(ChangeFreq::Monthly)
                    .priority(0.5),
            );
        }

        for route in routes.iter().take(self.limits.combined_reading_limit as usize) {
            urls.push(
                SitemapUrl::new(format!("{}/1", self.gallery_url(&route.slug)))
                    .lastmod(route.created_at.date_naive())
                    .changefreq(ChangeFreq::Monthly)
                    .priority(0.4),
            );
        }

        Ok(urls)
    }
}
