//! Sitemap generation.
//!
//! Lists every generated route for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use crate::config::SiteConfig;
use crate::route::{Route, RouteKind, RouteTable};
use crate::utils::date::DateUtc;
use crate::utils::fs::write_atomic;
use crate::log;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::PathBuf;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build the sitemap if enabled. Returns the written path.
pub fn build_sitemap(config: &SiteConfig, table: &RouteTable) -> Result<Option<PathBuf>> {
    if !config.sitemap.enable {
        return Ok(None);
    }

    let sitemap = Sitemap::build(config.site.origin(), table.routes(), DateUtc::today());
    let path = config.dist().join(&config.sitemap.path);
    write_atomic(&path, &sitemap.into_xml())
        .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;

    log!("sitemap"; "{}", config.root_relative(&path).display());
    Ok(Some(path))
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: DateUtc,
    changefreq: &'static str,
    /// Tenths, so `10` is `1.0`
    priority: u8,
}

impl UrlEntry {
    fn from_route(origin: &str, route: &Route, today: DateUtc) -> Self {
        let (priority, changefreq) = match route.kind {
            RouteKind::Static if route.path.is_root() => (10, "daily"),
            RouteKind::Static => (9, "daily"),
            RouteKind::Category => (8, "weekly"),
            RouteKind::Item => (7, "weekly"),
        };
        Self {
            loc: route.path.canonical(origin),
            lastmod: route.lastmod.unwrap_or(today),
            changefreq,
            priority,
        }
    }
}

impl Sitemap {
    fn build(origin: &str, routes: &[Route], today: DateUtc) -> Self {
        let mut urls: Vec<UrlEntry> = routes
            .iter()
            .map(|route| UrlEntry::from_route(origin, route, today))
            .collect();
        urls.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.loc.cmp(&b.loc)));
        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 160);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n    <lastmod>");
            xml.push_str(&entry.lastmod.to_string());
            xml.push_str("</lastmod>\n    <changefreq>");
            xml.push_str(entry.changefreq);
            xml.push_str("</changefreq>\n    <priority>");
            xml.push_str(&format!("{}.{}", entry.priority / 10, entry.priority % 10));
            xml.push_str("</priority>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
