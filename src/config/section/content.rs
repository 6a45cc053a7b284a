//! Route content tables: `[[pages]]`, `[[categories]]` and `[seo.<key>]`.
//!
//! # Example
//!
//! ```toml
//! [[pages]]
//! path = "/delivery/"
//! title = "Доставка тортів по Києву | Antreme"
//! description = "Доставка тортів по Києву в день замовлення."
//!
//! [[categories]]
//! key = "wedding"
//! slug = "vesilni"
//! group = "nested"
//!
//! [seo.wedding]
//! title = "Весільні торти на замовлення | Antreme"
//! description = "Весільні торти ручної роботи."
//! h1 = "Весільні торти"
//! html = "<p>Торти для вашого свята.</p>"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::RoutePath;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// A static page, taken verbatim into the route table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub path: RoutePath,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    /// HTML fragment placed into the mount element.
    #[serde(default)]
    pub content: Option<String>,
    /// JSON-LD objects for this page.
    #[serde(default)]
    pub structured_data: Vec<serde_json::Value>,
}

/// Where a category's page lives in the URL space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryGroup {
    /// `/<nested segment>/<slug>/`
    Nested,
    /// `/<slug>/`
    TopLevel,
}

/// One row of the storage-category to URL mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category id as stored by the catalog backend.
    pub key: String,
    /// URL slug.
    pub slug: String,
    pub group: CategoryGroup,
    /// Human-readable name for breadcrumbs. Defaults to the SEO h1/title.
    #[serde(default)]
    pub label: Option<String>,
}

/// Indexable copy for a category landing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoCopy {
    pub title: String,
    pub description: String,
    /// Page heading. Falls back to `title`.
    pub h1: Option<String>,
    /// Body copy, inserted as-is after the heading.
    pub html: String,
    pub image: Option<String>,
}

pub const FIELD_PAGES: FieldPath = FieldPath::new("pages");
pub const FIELD_CATEGORIES: FieldPath = FieldPath::new("categories");
pub const FIELD_SEO: FieldPath = FieldPath::new("seo");

/// Validate pages for empty titles and duplicate paths.
pub fn validate_pages(pages: &[PageConfig], diag: &mut ConfigDiagnostics) {
    let mut seen = FxHashSet::default();
    for page in pages {
        if page.title.trim().is_empty() {
            diag.error(FIELD_PAGES, format!("page `{}` has an empty title", page.path));
        }
        if !seen.insert(&page.path) {
            diag.warn(
                FIELD_PAGES,
                format!("page `{}` is declared more than once, first one wins", page.path),
            );
        }
    }
}

/// Validate the category mapping.
///
/// # Checks
/// - every storage key appears once
/// - every `(group, slug)` pair appears once
/// - slugs are single, non-empty path segments
/// - every `[seo.<key>]` table names a mapped category (warning)
pub fn validate_categories(
    categories: &[CategoryConfig],
    seo: &FxHashMap<String, SeoCopy>,
    diag: &mut ConfigDiagnostics,
) {
    let mut keys = FxHashSet::default();
    let mut slugs = FxHashSet::default();

    for category in categories {
        if category.key.trim().is_empty() {
            diag.error(FIELD_CATEGORIES, "category key is empty");
        } else if !keys.insert(category.key.as_str()) {
            diag.error(
                FIELD_CATEGORIES,
                format!("category key `{}` is mapped more than once", category.key),
            );
        }

        let slug = category.slug.trim_matches('/');
        if slug.is_empty() || slug.contains('/') {
            diag.error_with_hint(
                FIELD_CATEGORIES,
                format!("category `{}` has an invalid slug `{}`", category.key, category.slug),
                "slugs are a single path segment, e.g. \"vesilni\"",
            );
        } else if !slugs.insert((category.group, slug)) {
            diag.error(
                FIELD_CATEGORIES,
                format!("slug `{}` is used by more than one category in the same group", slug),
            );
        }
    }

    let mut orphans: Vec<_> = seo.keys().filter(|k| !keys.contains(k.as_str())).collect();
    orphans.sort();
    for key in orphans {
        diag.warn(
            FIELD_SEO,
            format!("[seo.{}] has no matching entry in [[categories]]", key),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_parse_pages() {
        let config = test_parse_config(
            r#"
[[pages]]
path = "delivery"
title = "Доставка"

[[pages]]
path = "/"
title = "Home"
description = "Cakes"
content = "<h1>Cakes</h1>"
structured_data = [{ "@type" = "Bakery", name = "Antreme" }]
"#,
        );
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.pages[0].path, "/delivery/");
        assert_eq!(config.pages[0].description, "");
        assert_eq!(config.pages[1].structured_data[0]["@type"], "Bakery");
    }

    #[test]
    fn test_parse_categories_keep_order() {
        let config = test_parse_config(
            r#"
[[categories]]
key = "wedding"
slug = "vesilni"
group = "nested"

[[categories]]
key = "bento"
slug = "bento-torty"
group = "top-level"
label = "Бенто-торти"
"#,
        );
        assert_eq!(config.categories[0].key, "wedding");
        assert_eq!(config.categories[0].group, CategoryGroup::Nested);
        assert_eq!(config.categories[1].group, CategoryGroup::TopLevel);
        assert_eq!(config.categories[1].label.as_deref(), Some("Бенто-торти"));
    }

    #[test]
    fn test_parse_seo_copy() {
        let config = test_parse_config(
            "[seo.wedding]\ntitle = \"Весільні торти\"\nhtml = \"<p>x</p>\"",
        );
        let copy = &config.seo["wedding"];
        assert_eq!(copy.title, "Весільні торти");
        assert!(copy.h1.is_none());
        assert_eq!(copy.html, "<p>x</p>");
    }

    #[test]
    fn test_validate_categories_duplicates() {
        let categories = vec![
            CategoryConfig {
                key: "wedding".into(),
                slug: "vesilni".into(),
                group: CategoryGroup::Nested,
                label: None,
            },
            CategoryConfig {
                key: "wedding".into(),
                slug: "other".into(),
                group: CategoryGroup::Nested,
                label: None,
            },
            CategoryConfig {
                key: "kids".into(),
                slug: "vesilni".into(),
                group: CategoryGroup::Nested,
                label: None,
            },
            // Same slug in the other group is a different URL
            CategoryConfig {
                key: "top".into(),
                slug: "vesilni".into(),
                group: CategoryGroup::TopLevel,
                label: None,
            },
        ];
        let mut diag = ConfigDiagnostics::new();
        validate_categories(&categories, &FxHashMap::default(), &mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_validate_categories_bad_slug_and_orphan_seo() {
        let categories = vec![CategoryConfig {
            key: "wedding".into(),
            slug: "a/b".into(),
            group: CategoryGroup::Nested,
            label: None,
        }];
        let mut seo = FxHashMap::default();
        seo.insert("ghost".to_string(), SeoCopy::default());

        let mut diag = ConfigDiagnostics::new();
        validate_categories(&categories, &seo, &mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_validate_pages() {
        let config = test_parse_config(
            "[[pages]]\npath = \"/a/\"\ntitle = \"\"\n[[pages]]\npath = \"/a\"\ntitle = \"A\"",
        );
        let mut diag = ConfigDiagnostics::new();
        validate_pages(&config.pages, &mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.warnings().len(), 1);
    }
}
