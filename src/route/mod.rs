//! Route table.
//!
//! Three sources feed the table, in this order:
//!
//! ```text
//! [[pages]]            -> Static    (verbatim)
//! [[categories]]+[seo] -> Category  (landing copy)
//! catalog items        -> Item      (product detail)
//! ```
//!
//! Paths are unique: the first route claiming a path wins.

pub mod category;
mod item;
mod page;

pub use category::{CategoryEntry, RouteCategoryMapping};

use crate::catalog::CatalogItem;
use crate::config::{SeoCopy, SiteConfig};
use crate::core::RoutePath;
use crate::seo::jsonld::Crumb;
use crate::utils::date::DateUtc;
use crate::{debug, debug_do, log};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;

/// Where a route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Static,
    Category,
    Item,
}

impl RouteKind {
    /// `og:type` value.
    pub const fn og_type(self) -> &'static str {
        match self {
            Self::Item => "product",
            Self::Static | Self::Category => "website",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Category => "category",
            Self::Item => "item",
        }
    }
}

/// One document to generate.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: RoutePath,
    pub kind: RouteKind,
    pub title: String,
    pub description: String,
    /// Social image as configured (not yet absolute).
    pub image: Option<String>,
    pub structured_data: Vec<Value>,
    /// HTML placed into the mount element.
    pub content: Option<String>,
    pub lastmod: Option<DateUtc>,
}

impl Route {
    #[inline]
    pub fn og_type(&self) -> &'static str {
        self.kind.og_type()
    }
}

/// Shared inputs of the route builders.
pub(crate) struct RouteContext<'a> {
    pub origin: &'a str,
    pub site_name: &'a str,
    pub currency: &'a str,
    pub mapping: &'a RouteCategoryMapping,
    pub seo: &'a FxHashMap<String, SeoCopy>,
}

impl RouteContext<'_> {
    /// First breadcrumb of every trail.
    fn home_crumb(&self) -> Crumb {
        Crumb {
            name: self.site_name.to_string(),
            url: RoutePath::root().canonical(self.origin),
        }
    }

    /// Display name of a category: explicit label, then SEO heading, then
    /// SEO title, then the slug.
    fn category_label(&self, entry: &CategoryEntry) -> String {
        let copy = self.seo.get(&entry.key);
        entry
            .label
            .as_deref()
            .or_else(|| copy.and_then(|c| c.h1.as_deref()))
            .or_else(|| copy.map(|c| c.title.as_str()))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&entry.slug)
            .to_string()
    }

    fn category_crumb(&self, entry: &CategoryEntry) -> Crumb {
        Crumb {
            name: self.category_label(entry),
            url: self.mapping.category_path(entry).canonical(self.origin),
        }
    }
}

/// Counts collected while building the table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RouteReport {
    pub static_routes: usize,
    pub categories: usize,
    pub items: usize,
    /// Mapped categories without `[seo.<key>]` copy.
    pub missing_copy: usize,
    /// Catalog items that produced no route.
    pub skipped_items: usize,
    /// Routes dropped because an earlier route had the same path.
    pub duplicates: usize,
}

impl RouteReport {
    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.static_routes + self.categories + self.items
    }
}

/// Ordered, duplicate-free route list.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    seen: FxHashSet<RoutePath>,
    pub report: RouteReport,
}

impl RouteTable {
    /// Add a route unless its path is already taken.
    fn push(&mut self, route: Route) {
        if !self.seen.insert(route.path.clone()) {
            log!("warn"; "duplicate route {} ({}), keeping the first one", route.path, route.kind.name());
            self.report.duplicates += 1;
            return;
        }
        match route.kind {
            RouteKind::Static => self.report.static_routes += 1,
            RouteKind::Category => self.report.categories += 1,
            RouteKind::Item => self.report.items += 1,
        }
        self.routes.push(route);
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

/// Build the route table from config and fetched catalog items.
pub fn collect_routes(config: &SiteConfig, items: &[CatalogItem]) -> RouteTable {
    let mapping = RouteCategoryMapping::new(&config.categories, &config.site.nested_segment);
    let ctx = RouteContext {
        origin: config.site.origin(),
        site_name: &config.site.name,
        currency: &config.site.currency,
        mapping: &mapping,
        seo: &config.seo,
    };

    let mut table = RouteTable::default();

    for route in page::static_routes(&config.pages) {
        table.push(route);
    }

    for entry in mapping.iter() {
        match page::category_route(&ctx, entry) {
            Some(route) => table.push(route),
            None => {
                log!("warn"; "category `{}` is mapped but has no [seo.{}] table, skipped (missing copy)", entry.key, entry.key);
                table.report.missing_copy += 1;
            }
        }
    }

    for catalog_item in items {
        match item::item_route(&ctx, catalog_item) {
            Ok(route) => table.push(route),
            Err(reason) => {
                log!("warn"; "item {} skipped: {}", catalog_item.label(), reason);
                table.report.skipped_items += 1;
            }
        }
    }

    debug_do! {
        debug!("route"; "{:?}", table.report);
        for route in table.iter() {
            debug!("route"; "{:<8} {}", route.kind.name(), route.path);
        }
    }
    table
}
