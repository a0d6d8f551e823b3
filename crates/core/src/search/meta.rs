//! SEO metadata for search result pages.

use serde::Serialize;
use serde_json::{json, Value};

use super::SearchHit;
use crate::config::SiteConfig;

/// Page metadata rendered alongside search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub keywords: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub prev: Option<String>,
    pub next: Option<String>,
    /// schema.org JSON-LD block.
    pub structured_data: Value,
}

/// Builds [`SearchMeta`] for one search path of a site.
pub(crate) struct MetaBuilder<'a> {
    site: &'a SiteConfig,
    path: &'a str,
}

impl<'a> MetaBuilder<'a> {
    pub(crate) fn new(site: &'a SiteConfig, path: &'a str) -> Self {
        Self { site, path }
    }

    fn page_url(&self) -> String {
        format!("{}{}", self.site.base_url(), self.path)
    }

    fn query_url(&self, query: &str) -> String {
        format!("{}?q={}", self.page_url(), urlencoding::encode(query))
    }

    fn page_link(&self, query: &str, page: u32) -> String {
        format!(
            "{}?q={}&page={}",
            self.path,
            urlencoding::encode(query),
            page
        )
    }

    /// Metadata for the bare search page (no query).
    pub(crate) fn empty_query(&self) -> SearchMeta {
        let name = &self.site.name;
        let title = format!("Search Hentai | {}", name);
        let description = format!(
            "Search for hentai content on {}. Find your favorite titles, tags, artists, and more.",
            name
        );

        SearchMeta {
            title: title.clone(),
            description: description.clone(),
            canonical: self.page_url(),
            keywords: format!("hentai search, {}, hentai titles, hentai tags", name.to_lowercase()),
            og_title: title,
            og_description: description,
            og_image: self.site.og_image(),
            prev: None,
            next: None,
            structured_data: json!({
                "@context": "https://schema.org",
                "@type": "WebPage",
                "name": "Hentai Search",
                "description": format!("Search for hentai content on {}", name),
                "url": self.page_url(),
            }),
        }
    }

    /// Metadata used when the catalog could not be queried.
    pub(crate) fn unavailable(&self, query: &str) -> SearchMeta {
        let name = &self.site.name;
        let title = format!("Search results for \"{}\" | {}", query, name);
        let description = format!("No hentai results found for \"{}\" on {}.", query, name);

        SearchMeta {
            title: title.clone(),
            description: description.clone(),
            canonical: self.query_url(query),
            keywords: format!("hentai search, {}, {}", query, name.to_lowercase()),
            og_title: title,
            og_description: description,
            og_image: self.site.og_image(),
            prev: None,
            next: None,
            structured_data: json!({
                "@context": "https://schema.org",
                "@type": "SearchResultsPage",
                "name": format!("Search results for \"{}\"", query),
                "description": format!("No hentai results found for \"{}\" on {}", query, name),
                "url": self.query_url(query),
            }),
        }
    }

    /// Metadata for a page of results.
    pub(crate) fn results(
        &self,
        query: &str,
        page: u32,
        total_pages: u32,
        total: u64,
        hits: &[SearchHit],
    ) -> SearchMeta {
        let name = &self.site.name;
        let title = if page > 1 {
            format!("Search results for \"{}\" – Page {} | {}", query, page, name)
        } else {
            format!("Search results for \"{}\" | {}", query, name)
        };
        let description = format!(
            "Discover {} hentai results for \"{}\" on {}. Page {} of {}.",
            total, query, name, page, total_pages
        );

        let items: Vec<Value> = hits
            .iter()
            .enumerate()
            .map(|(index, hit)| {
                json!({
                    "@type": "ListItem",
                    "position": index + 1,
                    "item": {
                        "@type": "CreativeWork",
                        "name": hit.title,
                        "url": format!(
                            "{}/{}/{}",
                            self.site.base_url(),
                            self.site.gallery_path,
                            hit.slug
                        ),
                        "image": hit.feature_image,
                        "author": hit.author.name,
                    }
                })
            })
            .collect();

        SearchMeta {
            title: title.clone(),
            description: description.clone(),
            canonical: self.query_url(query),
            keywords: format!(
                "hentai search, {}, {}, hentai titles, hentai tags",
                query,
                name.to_lowercase()
            ),
            og_title: title,
            og_description: description,
            og_image: self.site.og_image(),
            prev: (page > 1).then(|| self.page_link(query, page - 1)),
            next: (page < total_pages).then(|| self.page_link(query, page + 1)),
            structured_data: json!({
                "@context": "https://schema.org",
                "@type": "SearchResultsPage",
                "name": format!("Search results for \"{}\"", query),
                "description": format!("Discover {} hentai results for \"{}\" on {}", total, query, name),
                "url": self.query_url(query),
                "mainEntity": {
                    "@type": "ItemList",
                    "numberOfItems": total,
                    "itemListElement": items,
                },
                "breadcrumb": {
                    "@type": "BreadcrumbList",
                    "itemListElement": [
                        {
                            "@type": "ListItem",
                            "position": 1,
                            "name": "Home",
                            "item": self.site.base_url(),
                        },
                        {
                            "@type": "ListItem",
                            "position": 2,
                            "name": "Search",
                            "item": self.query_url(query),
                        }
                    ]
                }
            }),
        }
    }
}
