//! XML sitemaps of the public site.
//!
//! Every document is generated on demand from the catalog. Builders never
//! fail: when the catalog errors they render a minimal document (the
//! homepage alone, or an empty urlset) and flag it as degraded so it gets a
//! short cache lifetime.

mod builder;
mod xml;

pub use builder::{SitemapBuilder, SitemapDocument};
pub use xml::{render_index, render_urlset, ChangeFreq, SitemapRef, SitemapUrl};

/// Parse a gallery-page chunk index, accepting an optional `.xml` suffix.
pub fn parse_chunk_index(raw: &str) -> Option<u64> {
    raw.strip_suffix(".xml").unwrap_or(raw).parse().ok()
}
