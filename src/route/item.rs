//! Catalog item detail routes.

use super::{Route, RouteContext, RouteKind};
use crate::catalog::CatalogItem;
use crate::core::RoutePath;
use crate::seo::jsonld::{self, Crumb, ProductData};
use crate::seo::og::absolute_url;
use crate::utils::html::{collapse_whitespace, escape, truncate_chars};
use serde_json::Value;
use std::fmt;

/// Maximum length of a description derived from item text.
const DESCRIPTION_CHARS: usize = 160;

/// Why a catalog item produced no route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingSlug,
    /// Slug is not a single path segment.
    InvalidSlug,
    UnmappedCategory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingSlug => "missing slug",
            Self::InvalidSlug => "invalid slug",
            Self::UnmappedCategory => "unmapped category",
        })
    }
}

pub(super) fn item_route(ctx: &RouteContext<'_>, item: &CatalogItem) -> Result<Route, SkipReason> {
    let slug = item.slug().ok_or(SkipReason::MissingSlug)?;
    if slug.contains('/') || slug == "." || slug == ".." {
        return Err(SkipReason::InvalidSlug);
    }
    let entry = item
        .category()
        .and_then(|c| ctx.mapping.resolve(c))
        .ok_or(SkipReason::UnmappedCategory)?;

    let path = ctx.mapping.item_path(entry, slug);
    if !is_single_segment_under(&path, &ctx.mapping.category_path(entry), slug.trim()) {
        return Err(SkipReason::InvalidSlug);
    }
    let url = path.canonical(ctx.origin);
    let name = item.name.trim();

    let title = non_empty(item.meta_title.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} | {}", name, ctx.site_name));

    let body_text = non_empty(item.description.as_deref()).map(collapse_whitespace);
    let description = non_empty(item.meta_description.as_deref())
        .map(str::to_string)
        .or_else(|| {
            body_text
                .as_deref()
                .map(|text| truncate_chars(text, DESCRIPTION_CHARS).to_string())
        })
        .unwrap_or_else(|| format!("{} — {}", name, ctx.site_name));

    let image = non_empty(item.og_image.as_deref())
        .or_else(|| non_empty(item.image_url.as_deref()))
        .map(str::to_string);

    let mut structured_data = match item.custom_schema() {
        Some(Value::Array(values)) => values,
        Some(value) => vec![value],
        None => {
            let image_url = image.as_deref().map(|i| absolute_url(ctx.origin, i));
            vec![jsonld::product(&ProductData {
                name,
                description: &description,
                image: image_url.as_deref(),
                url: &url,
                price: item.price,
                currency: ctx.currency,
                available: item.available(),
            })]
        }
    };
    structured_data.push(jsonld::breadcrumb_list(&[
        ctx.home_crumb(),
        ctx.category_crumb(entry),
        Crumb {
            name: name.to_string(),
            url: url.clone(),
        },
    ]));

    let mut content = format!("<article><h1>{}</h1>", escape(name));
    if let Some(text) = &body_text {
        content.push_str(&format!("<p>{}</p>", escape(text)));
    }
    content.push_str("</article>");

    Ok(Route {
        path,
        kind: RouteKind::Item,
        title,
        description,
        image,
        structured_data,
        content: Some(content),
        lastmod: item.lastmod(),
    })
}

/// `path` is `parent` plus exactly one segment spelled as `slug`.
///
/// Path normalization drops query and fragment suffixes and decodes percent
/// escapes, so a slug like `a?b` or `x%2Fy` lands somewhere else.
fn is_single_segment_under(path: &RoutePath, parent: &RoutePath, slug: &str) -> bool {
    path.segments().count() == parent.segments().count() + 1 && path.segments().last() == Some(slug)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
