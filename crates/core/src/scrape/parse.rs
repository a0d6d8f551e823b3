//! HTML extraction for gallery and reading pages.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{GalleryMetadata, ScrapeError};
use crate::catalog::{FacetKind, FacetSet};

const TITLE: &str = "h1.title span.pretty, h2.title span.pretty";
const COVER_IMAGE: &str = "#cover img";
const TAGS_BLOCK: &str = "#tags";
const TAG_CONTAINER: &str = "#tags .tag-container";
const TAG_TYPE: &str = ".tag.type";
const TAG_NAME: &str = "a.tag .name";
const THUMBNAIL: &str = "#thumbnail-container .thumb-container";
const PAGE_IMAGE: &str = "#img";

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{}: {:?}", css, e)))
}

/// `data-src` if present and non-empty, else `src`, else `""`.
fn lazy_image_src(element: ElementRef<'_>) -> String {
    let value = element.value();
    value
        .attr("data-src")
        .filter(|src| !src.is_empty())
        .or_else(|| value.attr("src"))
        .unwrap_or_default()
        .to_string()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Extract gallery metadata from a gallery landing page.
///
/// Missing pieces come back empty: a gallery without a title gets
/// `"<fallback_prefix> #<id>"`, a missing cover yields `""`, unknown tag
/// categories are ignored.
pub fn parse_gallery_html(
    html: &str,
    id: u64,
    fallback_prefix: &str,
) -> Result<GalleryMetadata, ScrapeError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector(TITLE)?)
        .next()
        .map(|el| element_text(el).trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| format!("{} #{}", fallback_prefix, id));

    let feature_image_url = document
        .select(&selector(COVER_IMAGE)?)
        .next()
        .map(lazy_image_src)
        .unwrap_or_default();

    if document.select(&selector(TAGS_BLOCK)?).next().is_none() {
        warn!(gallery_id = id, "Gallery page has no tags block");
    }

    let type_selector = selector(TAG_TYPE)?;
    let name_selector = selector(TAG_NAME)?;
    let mut facets = FacetSet::new();

    for container in document.select(&selector(TAG_CONTAINER)?) {
        let label: String = container.select(&type_selector).map(element_text).collect();

        let Some(kind) = FacetKind::from_label(&label) else {
            debug!(gallery_id = id, label = %label.trim(), "Ignoring unknown tag category");
            continue;
        };

        let names = container
            .select(&name_selector)
            .map(|el| element_text(el).trim().to_string())
            .filter(|name| !name.is_empty());

        facets.extend(kind, names);
    }

    let total_pages = document.select(&selector(THUMBNAIL)?).count() as u32;
    if total_pages == 0 {
        warn!(gallery_id = id, "Gallery page has no thumbnails");
    }

    Ok(GalleryMetadata {
        id,
        title,
        feature_image_url,
        total_pages,
        facets,
    })
}

/// Extract the image URL from a reading page, `""` if there is none.
pub fn parse_page_image(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector(PAGE_IMAGE)?)
        .next()
        .map(lazy_image_src)
        .unwrap_or_default())
}
