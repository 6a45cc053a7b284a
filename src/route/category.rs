//! Storage category to URL mapping.
//!
//! The catalog backend files items under short category keys (`wedding`,
//! `bento`). Public URLs use localized slugs, and some categories live under
//! a shared parent segment while others sit at the top level:
//!
//! ```text
//! wedding -> /torty-na-zamovlennya/vesilni/   (nested)
//! bento   -> /bento-torty/                    (top-level)
//! ```

use crate::config::{CategoryConfig, CategoryGroup};
use crate::core::RoutePath;
use rustc_hash::FxHashMap;

/// One mapped category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub key: String,
    pub slug: String,
    pub group: CategoryGroup,
    pub label: Option<String>,
}

/// Bidirectional `category key <-> (slug, group)` lookup.
///
/// Built once from `[[categories]]`; iteration follows declaration order.
#[derive(Debug, Clone)]
pub struct RouteCategoryMapping {
    entries: Vec<CategoryEntry>,
    by_key: FxHashMap<String, usize>,
    by_slug: FxHashMap<String, usize>,
    nested_base: RoutePath,
}

impl RouteCategoryMapping {
    /// Build from config rows. Validation has already rejected duplicate keys;
    /// if any slip through, the first row wins.
    pub fn new(categories: &[CategoryConfig], nested_segment: &str) -> Self {
        let mut entries = Vec::with_capacity(categories.len());
        let mut by_key = FxHashMap::default();
        let mut by_slug = FxHashMap::default();

        for row in categories {
            if by_key.contains_key(&row.key) {
                continue;
            }
            let entry = CategoryEntry {
                key: row.key.clone(),
                slug: row.slug.trim_matches('/').to_string(),
                group: row.group,
                label: row.label.clone(),
            };
            let idx = entries.len();
            by_key.insert(entry.key.clone(), idx);
            by_slug.entry(entry.slug.clone()).or_insert(idx);
            entries.push(entry);
        }

        Self {
            entries,
            by_key,
            by_slug,
            nested_base: RoutePath::new(nested_segment),
        }
    }

    /// Look up a storage category key.
    pub fn resolve(&self, category: &str) -> Option<&CategoryEntry> {
        self.by_key.get(category).map(|&idx| &self.entries[idx])
    }

    /// Reverse lookup: which storage category owns this URL slug.
    pub fn category_for_slug(&self, slug: &str) -> Option<&str> {
        self.by_slug
            .get(slug.trim_matches('/'))
            .map(|&idx| self.entries[idx].key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Landing page path of a category.
    pub fn category_path(&self, entry: &CategoryEntry) -> RoutePath {
        match entry.group {
            CategoryGroup::Nested => self.nested_base.join(&entry.slug),
            CategoryGroup::TopLevel => RoutePath::root().join(&entry.slug),
        }
    }

    /// Detail page path of an item in a category.
    pub fn item_path(&self, entry: &CategoryEntry, item_slug: &str) -> RoutePath {
        self.category_path(entry).join(item_slug)
    }
}
