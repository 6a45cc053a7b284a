//! HTML utility functions.
//!
//! Provides the textual HTML helpers the pipeline needs:
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `collapse_whitespace()` - normalize free text before it lands in meta tags
//! - `find_element_by_id()` - balanced-tag scan for a single element

use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape HTML attribute values.
///
/// Identical to `escape()` but semantically indicates attribute context.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Collapse runs of whitespace (including newlines) into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Take at most `limit` characters from `s`, on a char boundary.
pub fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].trim_end(),
        None => s,
    }
}

// =============================================================================
// Element lookup
// =============================================================================

/// Byte ranges of a single element inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    /// Lowercased tag name.
    pub tag: String,
    /// Whole element, opening tag through closing tag.
    pub outer: Range<usize>,
    /// Content between the opening and closing tags.
    pub inner: Range<usize>,
}

impl ElementSpan {
    /// Opening tag text (e.g. `<div id="root" class="app">`).
    pub fn open_tag<'a>(&self, html: &'a str) -> &'a str {
        &html[self.outer.start..self.inner.start]
    }

    pub fn inner_html<'a>(&self, html: &'a str) -> &'a str {
        &html[self.inner.clone()]
    }

    /// `true` when the element holds nothing but whitespace.
    pub fn is_empty(&self, html: &str) -> bool {
        self.inner_html(html).trim().is_empty()
    }
}

/// Opening tag with its name captured.
static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<([a-z][a-z0-9-]*)\b[^>]*>").unwrap());

/// `id` attribute value inside an opening tag.
static ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\sid\s*=\s*["']([^"']*)["']"#).unwrap());

/// Opening or closing tag: `(/?)` then the name.
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)([a-z][a-z0-9-]*)\b[^>]*>").unwrap());

/// Find the first element whose `id` attribute equals `id`.
///
/// The closing tag is found by counting nested open/close tags of the same
/// name, so `<div id="root"><div>..</div></div>` resolves to the outer div.
/// Returns `None` when no such element exists or it is never closed.
pub fn find_element_by_id(html: &str, id: &str) -> Option<ElementSpan> {
    let (whole, tag) = OPEN_TAG.captures_iter(html).find_map(|caps| {
        let whole = caps.get(0)?;
        let matches = ID_ATTR
            .captures(whole.as_str())
            .and_then(|attr| attr.get(1))
            .is_some_and(|value| value.as_str() == id);
        matches.then(|| (whole, caps[1].to_ascii_lowercase()))
    })?;

    if whole.as_str().ends_with("/>") {
        return Some(ElementSpan {
            tag,
            outer: whole.range(),
            inner: whole.end()..whole.end(),
        });
    }

    let mut depth = 1usize;
    for m in ANY_TAG.captures_iter(&html[whole.end()..]) {
        let (Some(full), Some(slash), Some(name)) = (m.get(0), m.get(1), m.get(2)) else {
            continue;
        };
        if !name.as_str().eq_ignore_ascii_case(&tag) {
            continue;
        }
        if slash.as_str().is_empty() {
            if !full.as_str().ends_with("/>") {
                depth += 1;
            }
            continue;
        }
        depth -= 1;
        if depth == 0 {
            let close_start = whole.end() + full.start();
            let close_end = whole.end() + full.end();
            return Some(ElementSpan {
                tag,
                outer: whole.start()..close_end,
                inner: whole.end()..close_start,
            });
        }
    }
    None
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape("hello world"), "hello world");
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("normal"), "normal");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
    }

    #[test]
    fn test_escape_cyrillic_untouched() {
        assert_eq!(escape("Весільні торти"), "Весільні торти");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\n b\t c "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("Торт з вишнею", 4), "Торт");
        assert_eq!(truncate_chars("short", 10), "short");
        // Trailing space at the cut is dropped
        assert_eq!(truncate_chars("ab cd", 3), "ab");
    }

    #[test]
    fn test_find_empty_mount() {
        let html = r#"<body><div id="root"></div><script src="/a.js"></script></body>"#;
        let span = find_element_by_id(html, "root").unwrap();
        assert_eq!(span.tag, "div");
        assert!(span.is_empty(html));
        assert_eq!(&html[span.outer.clone()], r#"<div id="root"></div>"#);
    }

    #[test]
    fn test_find_nested_mount() {
        let html = r#"<div id="root"><div class="a"><div>x</div></div><p>y</p></div><div>after</div>"#;
        let span = find_element_by_id(html, "root").unwrap();
        assert_eq!(
            span.inner_html(html),
            r#"<div class="a"><div>x</div></div><p>y</p>"#
        );
        assert!(!span.is_empty(html));
    }

    #[test]
    fn test_find_with_other_attributes() {
        let html = r#"<main class="app" ID='root' data-x="1">hi</main>"#;
        let span = find_element_by_id(html, "root").unwrap();
        assert_eq!(span.tag, "main");
        assert_eq!(span.open_tag(html), r#"<main class="app" ID='root' data-x="1">"#);
        assert_eq!(span.inner_html(html), "hi");
    }

    #[test]
    fn test_find_does_not_match_prefixed_id() {
        let html = r#"<div id="rooted"></div>"#;
        assert!(find_element_by_id(html, "root").is_none());

        let html = r#"<div data-id="root"></div>"#;
        assert!(find_element_by_id(html, "root").is_none());
    }

    #[test]
    fn test_find_many_ids_in_one_document() {
        let html = r#"<header id="top"><span id="a.b">x</span></header><section id="axb"><section id="inner"></section></section>"#;
        assert_eq!(find_element_by_id(html, "top").unwrap().tag, "header");
        assert_eq!(find_element_by_id(html, "a.b").unwrap().inner_html(html), "x");
        assert_eq!(
            find_element_by_id(html, "axb").unwrap().inner_html(html),
            r#"<section id="inner"></section>"#
        );
        assert!(find_element_by_id(html, "a*b").is_none());
    }

    #[test]
    fn test_find_self_closing() {
        let html = r#"<body><div id="root" /></body>"#;
        let span = find_element_by_id(html, "root").unwrap();
        assert!(span.is_empty(html));
        assert_eq!(span.outer.end, html.find("</body>").unwrap());
    }

    #[test]
    fn test_find_unclosed_element() {
        let html = r#"<div id="root"><div></div>"#;
        assert!(find_element_by_id(html, "root").is_none());
    }
}
