//! `<head>` surgery for route documents.
//!
//! Every tag this module writes carries `data-rh="true"`, the marker the
//! SPA's head manager uses, so client-side hydration takes the tags over
//! instead of duplicating them.
//!
//! Injection is idempotent: stripping removes exactly what injection adds
//! (plus the whitespace after it), so running over a previous output yields
//! the same head.

use crate::utils::html::{escape, escape_attr};
use regex::Regex;
use std::sync::LazyLock;

/// Hydration marker attribute.
pub const MARKER: &str = r#"data-rh="true""#;

/// Title, description/robots/og:*/twitter:* metas, canonical link, JSON-LD.
static MANAGED_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?is)"#,
        r#"(?:<title\b[^>]*>.*?</title\s*>"#,
        r#"|<meta\b[^>]*?\s(?:name|property)\s*=\s*["'](?:description|robots|og:[^"']*|twitter:[^"']*)["'][^>]*>"#,
        r#"|<link\b[^>]*?\srel\s*=\s*["']canonical["'][^>]*>"#,
        r#"|<script\b[^>]*?\stype\s*=\s*["']application/ld\+json["'][^>]*>.*?</script\s*>)"#,
        r#"\s*"#,
    ))
    .unwrap()
});

static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

/// Byte offset of the first `</head>`.
pub fn head_close(html: &str) -> Option<usize> {
    HEAD_CLOSE.find(html).map(|m| m.start())
}

/// Remove every managed tag from the head. Body content is left alone.
///
/// Returns `None` when the document has no `</head>`.
pub fn strip_managed_tags(html: &str) -> Option<String> {
    let close = head_close(html)?;
    let (head, rest) = html.split_at(close);
    let stripped = MANAGED_TAGS.replace_all(head, "");
    Some(format!("{}{}", stripped, rest))
}

/// Insert `tags` right before `</head>`, one per line.
///
/// Trailing whitespace before `</head>` is normalized so repeated runs
/// produce identical output. Returns `None` when there is no `</head>`.
pub fn inject_before_head_close(html: &str, tags: &[String]) -> Option<String> {
    let close = head_close(html)?;
    let (head, rest) = html.split_at(close);

    let mut out = String::with_capacity(html.len() + tags.iter().map(|t| t.len() + 5).sum::<usize>());
    out.push_str(head.trim_end());
    for tag in tags {
        out.push_str("\n    ");
        out.push_str(tag);
    }
    out.push_str("\n  ");
    out.push_str(rest);
    Some(out)
}

/// Metadata for one document, already resolved to final strings.
#[derive(Debug, Clone)]
pub struct HeadMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub canonical: &'a str,
    pub robots: &'a str,
    pub og_type: &'a str,
    pub image: &'a str,
    pub site_name: &'a str,
    pub twitter_card: &'a str,
}

/// Marked metadata tags in their fixed order.
pub fn build_meta_block(meta: &HeadMeta<'_>) -> Vec<String> {
    vec![
        title_tag(meta.title),
        meta_name("description", meta.description),
        format!(r#"<link rel="canonical" href="{}" {MARKER}>"#, escape_attr(meta.canonical)),
        meta_name("robots", meta.robots),
        meta_property("og:type", meta.og_type),
        meta_property("og:title", meta.title),
        meta_property("og:description", meta.description),
        meta_property("og:url", meta.canonical),
        meta_property("og:image", meta.image),
        meta_property("og:site_name", meta.site_name),
        meta_name("twitter:card", meta.twitter_card),
        meta_name("twitter:title", meta.title),
        meta_name("twitter:description", meta.description),
        meta_name("twitter:image", meta.image),
    ]
}

/// Marked JSON-LD script. `json` must already be script-safe.
pub fn jsonld_tag(json: &str) -> String {
    format!(r#"<script type="application/ld+json" {MARKER}>{json}</script>"#)
}

pub fn title_tag(title: &str) -> String {
    format!("<title {MARKER}>{}</title>", escape(title))
}

pub fn meta_name(name: &str, content: &str) -> String {
    format!(r#"<meta name="{name}" content="{}" {MARKER}>"#, escape_attr(content))
}

fn meta_property(property: &str, content: &str) -> String {
    format!(r#"<meta property="{property}" content="{}" {MARKER}>"#, escape_attr(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<!doctype html>
<html lang="uk">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Antreme</title>
    <meta name="description" content="Default" />
    <meta property="og:title" content="Default" />
    <meta name="twitter:card" content="summary" />
    <link rel="canonical" href="https://antreme.kyiv.ua/" />
    <link rel="icon" href="/favicon.ico" />
    <script type="application/ld+json">{"@type":"Bakery"}</script>
    <script type="module" src="/assets/index.js"></script>
  </head>
  <body>
    <svg><title>icon</title></svg>
    <div id="root"></div>
  </body>
</html>
"#;

    fn meta() -> HeadMeta<'static> {
        HeadMeta {
            title: "Весільні торти | Antreme",
            description: "Торти \"на замовлення\" & більше",
            canonical: "https://antreme.kyiv.ua/torty-na-zamovlennya/vesilni/",
            robots: "index, follow",
            og_type: "website",
            image: "https://antreme.kyiv.ua/og-image.jpg",
            site_name: "Antreme",
            twitter_card: "summary_large_image",
        }
    }

    fn render(html: &str) -> String {
        let stripped = strip_managed_tags(html).unwrap();
        let mut tags = build_meta_block(&meta());
        tags.push(jsonld_tag(r#"{"@type":"Product"}"#));
        inject_before_head_close(&stripped, &tags).unwrap()
    }

    #[test]
    fn test_strip_removes_managed_keeps_others() {
        let stripped = strip_managed_tags(TEMPLATE).unwrap();
        assert!(!stripped.contains("<title>Antreme</title>"));
        assert!(!stripped.contains(r#"content="Default""#));
        assert!(!stripped.contains("twitter:card"));
        assert!(!stripped.contains("canonical"));
        assert!(!stripped.contains("Bakery"));

        assert!(stripped.contains(r#"<meta charset="UTF-8" />"#));
        assert!(stripped.contains(r#"name="viewport""#));
        assert!(stripped.contains(r#"rel="icon""#));
        assert!(stripped.contains(r#"<script type="module""#));
        // Body titles are not head titles
        assert!(stripped.contains("<svg><title>icon</title></svg>"));
    }

    #[test]
    fn test_inject_single_title_with_marker() {
        let out = render(TEMPLATE);
        assert_eq!(out.matches("<title").count(), 2); // head + svg
        assert!(out.contains(r#"<title data-rh="true">Весільні торти | Antreme</title>"#));
        assert_eq!(out.matches(r#"rel="canonical""#).count(), 1);
        assert_eq!(out.matches("application/ld+json").count(), 1);
    }

    #[test]
    fn test_inject_escapes_attributes() {
        let out = render(TEMPLATE);
        assert!(out.contains(r#"content="Торти &quot;на замовлення&quot; &amp; більше""#));
    }

    #[test]
    fn test_tag_order() {
        let out = render(TEMPLATE);
        let pos = |needle: &str| out.find(needle).unwrap();
        assert!(pos("<title data-rh") < pos(r#"name="description""#));
        assert!(pos(r#"name="description""#) < pos(r#"rel="canonical""#));
        assert!(pos(r#"rel="canonical""#) < pos(r#"name="robots""#));
        assert!(pos(r#"property="og:type""#) < pos(r#"property="og:site_name""#));
        assert!(pos(r#"property="og:site_name""#) < pos(r#"name="twitter:card""#));
        assert!(pos(r#"name="twitter:image""#) < pos("application/ld+json"));
        assert!(pos("application/ld+json") < pos("</head>"));
    }

    #[test]
    fn test_idempotent() {
        let once = render(TEMPLATE);
        let twice = render(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_is_case_insensitive() {
        let html = "<HEAD><TITLE>X</TITLE><META NAME=\"Description\" CONTENT=\"d\"></HEAD><body></body>";
        let stripped = strip_managed_tags(html).unwrap();
        assert_eq!(stripped, "<HEAD></HEAD><body></body>");
    }

    #[test]
    fn test_data_attribute_lookalikes_kept() {
        let html = r#"<head><meta data-name="description" content="x"></head>"#;
        assert_eq!(strip_managed_tags(html).unwrap(), html);
    }

    #[test]
    fn test_missing_head_close() {
        assert!(strip_managed_tags("<html><body></body></html>").is_none());
        assert!(inject_before_head_close("<html></html>", &[]).is_none());
    }
}
