//! Sitemap XML rendering.

use chrono::NaiveDate;
use quick_xml::escape::escape;
use serde::Serialize;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// `<changefreq>` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

/// One `<url>` of a urlset.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: Option<NaiveDate>,
    pub changefreq: Option<ChangeFreq>,
    pub priority: Option<f32>,
}

impl SitemapUrl {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    pub fn lastmod(mut self, date: NaiveDate) -> Self {
        self.lastmod = Some(date);
        self
    }

    pub fn changefreq(mut self, changefreq: ChangeFreq) -> Self {
        self.changefreq = Some(changefreq);
        self
    }

    pub fn priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// One `<sitemap>` of a sitemap index.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapRef {
    pub loc: String,
    pub lastmod: NaiveDate,
}

/// Render a `<urlset>` document.
pub fn render_urlset(urls: &[SitemapUrl]) -> String {
    let mut out = String::with_capacity(128 + urls.len() * 160);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NS));

    for url in urls {
        out.push_str("  <url>\n");
        out.push_str(&format!("    <loc>{}</loc>\n", escape(url.loc.as_str())));
        if let Some(lastmod) = url.lastmod {
            out.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod.format("%Y-%m-%d")));
        }
        if let Some(changefreq) = url.changefreq {
            out.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq.as_str()));
        }
        if let Some(priority) = url.priority {
            out.push_str(&format!("    <priority>{:.1}</priority>\n", priority));
        }
        out.push_str("  </url>\n");
    }

    out.push_str("</urlset>\n");
    out
}

/// Render a `<sitemapindex>` document.
pub fn render_index(sitemaps: &[SitemapRef]) -> String {
    let mut out = String::with_capacity(128 + sitemaps.len() * 120);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str(&format!("<sitemapindex xmlns=\"{}\">\n", SITEMAP_NS));

    for sitemap in sitemaps {
        out.push_str("  <sitemap>\n");
        out.push_str(&format!("    <loc>{}</loc>\n", escape(sitemap.loc.as_str())));
        out.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            sitemap.lastmod.format("%Y-%m-%d")
        ));
        out.push_str("  </sitemap>\n");
    }

    out.push_str("</sitemapindex>\n");
    out
}
