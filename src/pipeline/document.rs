//! Per-route document construction.
//!
//! ```text
//! template ─► strip managed tags ─► inject meta block ─► inject JSON-LD
//!          ─► replace mount content ─► document
//! ```

use super::{PipelineError, Template};
use crate::config::SiteConfig;
use crate::route::Route;
use crate::seo::head::{self, HeadMeta, MARKER};
use crate::seo::jsonld::to_script_json;
use crate::seo::og::OgDefaults;
use crate::utils::html::find_element_by_id;

/// Site-wide values every document needs.
pub struct DocumentContext<'a> {
    pub origin: &'a str,
    pub robots: &'a str,
    pub mount_id: &'a str,
    pub og: OgDefaults<'a>,
}

impl<'a> DocumentContext<'a> {
    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self {
            origin: config.site.origin(),
            robots: &config.site.robots,
            mount_id: &config.site.mount_id,
            og: OgDefaults::from_config(config),
        }
    }
}

/// Build the full document for one route.
pub fn render_route(
    template: &Template,
    route: &Route,
    ctx: &DocumentContext<'_>,
) -> Result<String, PipelineError> {
    let malformed = || PipelineError::MalformedTemplate(template.path.clone());

    let stripped = head::strip_managed_tags(&template.html).ok_or_else(malformed)?;

    let canonical = route.path.canonical(ctx.origin);
    let image = ctx.og.image(ctx.origin, route.image.as_deref());
    let mut tags = head::build_meta_block(&HeadMeta {
        title: &route.title,
        description: &route.description,
        canonical: &canonical,
        robots: ctx.robots,
        og_type: route.og_type(),
        image: &image,
        site_name: ctx.og.site_name,
        twitter_card: ctx.og.twitter_card,
    });
    if let Some(json) = to_script_json(&route.structured_data) {
        tags.push(head::jsonld_tag(&json));
    }

    let html = head::inject_before_head_close(&stripped, &tags).ok_or_else(malformed)?;
    Ok(replace_mount(&html, ctx.mount_id, route.content.as_deref()))
}

/// Replace the mount element's content.
///
/// With `content`, the element gets `<div data-rh="true">content</div>`;
/// without, it is emptied. A document without the mount element is returned
/// unchanged.
pub fn replace_mount(html: &str, mount_id: &str, content: Option<&str>) -> String {
    let Some(span) = find_element_by_id(html, mount_id) else {
        return html.to_string();
    };
    // Self-closing mount: nothing to fill.
    if span.inner.start == span.outer.end {
        return html.to_string();
    }

    let inner = content
        .map(|c| format!("<div {MARKER}>{c}</div>"))
        .unwrap_or_default();

    let mut out = String::with_capacity(html.len() + inner.len());
    out.push_str(&html[..span.inner.start]);
    out.push_str(&inner);
    out.push_str(&html[span.inner.end..]);
    out
}
