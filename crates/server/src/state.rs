use std::sync::Arc;

use shelf_core::{
    CatalogStore, Config, GalleryScraper, Ingestor, SearchService, SitemapBuilder,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn CatalogStore>,
    ingestor: Ingestor,
    search: SearchService,
    sitemaps: SitemapBuilder,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn CatalogStore>,
        scraper: Arc<dyn GalleryScraper>,
    ) -> Self {
        let ingestor = Ingestor::new(Arc::clone(&catalog), scraper);
        let search = SearchService::new(Arc::clone(&catalog), config.site.clone());
        let sitemaps = SitemapBuilder::new(
            Arc::clone(&catalog),
            config.site.clone(),
            config.sitemap.clone(),
        );

        Self {
            config,
            catalog,
            ingestor,
            search,
            sitemaps,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn sitemaps(&self) -> &SitemapBuilder {
        &self.sitemaps
    }
}
