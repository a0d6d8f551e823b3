//! Testing utilities and mock implementations.
//!
//! This module provides a mock upstream scraper and an always-failing
//! catalog, so ingestion, search and sitemaps can be exercised without
//! network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_core::testing::{fixtures, MockGalleryScraper};
//!
//! let scraper = MockGalleryScraper::new();
//! scraper.add_gallery(fixtures::gallery_metadata(177013, "Some Title", 3)).await;
//!
//! // Use in an Ingestor or AppState...
//! ```

mod failing_catalog;
mod mock_scraper;

pub use failing_catalog::FailingCatalog;
pub use mock_scraper::{MockGalleryScraper, RecordedScrape};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{FacetKind, FacetSet, NewGallery};
    use crate::scrape::GalleryMetadata;
    use crate::slug::normalize_slug;

    /// Facets shared by every fixture gallery.
    pub fn default_facets() -> FacetSet {
        FacetSet::new()
            .with(FacetKind::Tag, ["full color", "comedy"])
            .with(FacetKind::Artist, ["shindol"])
            .with(FacetKind::Language, ["english", "translated"])
    }

    /// Scraped metadata with reasonable defaults.
    pub fn gallery_metadata(id: u64, title: &str, total_pages: u32) -> GalleryMetadata {
        GalleryMetadata {
            id,
            title: title.to_string(),
            feature_image_url: format!("https://t.example/galleries/{}/cover.jpg", id),
            total_pages,
            facets: default_facets(),
        }
    }

    /// A two-page gallery ready for [`crate::catalog::CatalogStore::insert_gallery`].
    pub fn new_gallery(external_id: u64, title: &str) -> NewGallery {
        NewGallery {
            external_id,
            title: title.to_string(),
            feature_image_url: format!("https://t.example/galleries/{}/cover.jpg", external_id),
            slug: normalize_slug(title),
            pages: (1..=2)
                .map(|page| format!("https://i.example/galleries/{}/{}.jpg", external_id, page))
                .collect(),
            facets: default_facets(),
        }
    }

    /// Gallery landing page markup in the upstream layout.
    ///
    /// `facets` pairs a category label such as `"Tags:"` with its names.
    pub fn gallery_html(title: &str, facets: &[(&str, &[&str])], thumbnails: u32) -> String {
        let containers: String = facets
            .iter()
            .map(|(label, names)| {
                let links: String = names
                    .iter()
                    .map(|name| {
                        format!(
                            r#"<a class="tag" href="/x/"><span class="name">{}</span><span class="count">1</span></a>"#,
                            name
                        )
                    })
                    .collect();
                format!(
                    r#"<div class="tag-container field-name"><span class="tag type">{}</span><span class="tags">{}</span></div>"#,
                    label, links
                )
            })
            .collect();

        let thumbs: String = (1..=thumbnails)
            .map(|page| {
                format!(
                    r#"<div class="thumb-container"><a class="gallerythumb" href="/g/1/{}/"><img data-src="https://t.example/{}t.jpg"></a></div>"#,
                    page, page
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
<body>
<div id="bigcontainer">
  <div id="cover"><a href="/g/1/1/"><img class="lazyload" data-src="https://t.example/cover.jpg" src="data:image/gif;base64,R0lGOD"></a></div>
  <div id="info-block">
    <h1 class="title"><span class="before">[Circle] </span><span class="pretty">{}</span><span class="after"> [English]</span></h1>
    <section id="tags">{}</section>
  </div>
</div>
<div id="thumbnail-container"><div class="thumbs">{}</div></div>
</body>
</html>"#,
            title, containers, thumbs
        )
    }

    /// Reading page markup in the upstream layout.
    pub fn page_html(image_url: &str) -> String {
        format!(
            r#"<html><body><section id="image-container"><a href="/next"><img id="img" src="{}"></a></section></body></html>"#,
            image_url
        )
    }
}
