//! Open Graph and Twitter Card values.
//!
//! Pure data: the tags themselves are rendered by `seo::head`.

use crate::config::SiteConfig;

/// Site-level social defaults.
pub struct OgDefaults<'a> {
    pub site_name: &'a str,
    pub default_image: &'a str,
    pub twitter_card: &'a str,
}

impl<'a> OgDefaults<'a> {
    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self {
            site_name: &config.site.name,
            default_image: &config.site.default_image,
            twitter_card: &config.site.twitter_card,
        }
    }

    /// Absolute social image URL for a route.
    ///
    /// The route's own image wins; otherwise the site default is used.
    pub fn image(&self, origin: &str, route_image: Option<&str>) -> String {
        let image = route_image
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_image);
        absolute_url(origin, image)
    }
}

/// Make `url` absolute against `origin`.
///
/// - `https://cdn.example.com/a.jpg` stays as is
/// - `//cdn.example.com/a.jpg` gets the origin's scheme
/// - `/a.jpg` and `a.jpg` resolve against the site root
pub fn absolute_url(origin: &str, url: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if let Some(rest) = url.strip_prefix("//") {
        let scheme = origin.split_once("://").map_or("https", |(s, _)| s);
        return format!("{scheme}://{rest}");
    }
    if has_scheme(url) {
        return url.to_string();
    }
    format!("{}/{}", origin, url.trim_start_matches('/'))
}

/// `scheme:` prefix per RFC 3986 (letter, then letters/digits/`+-.`).
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://antreme.kyiv.ua";

    #[test]
    fn test_absolute_url_variants() {
        assert_eq!(
            absolute_url(ORIGIN, "https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(absolute_url(ORIGIN, "/images/a.jpg"), "https://antreme.kyiv.ua/images/a.jpg");
        assert_eq!(absolute_url(ORIGIN, "images/a.jpg"), "https://antreme.kyiv.ua/images/a.jpg");
        assert_eq!(absolute_url(ORIGIN, "//cdn.example.com/a.jpg"), "https://cdn.example.com/a.jpg");
        assert_eq!(absolute_url("https://antreme.kyiv.ua/", "/a.jpg"), "https://antreme.kyiv.ua/a.jpg");
    }

    #[test]
    fn test_colon_in_path_is_not_a_scheme() {
        assert_eq!(absolute_url(ORIGIN, "/a:b.jpg"), "https://antreme.kyiv.ua/a:b.jpg");
        assert_eq!(absolute_url(ORIGIN, "1x:2.jpg"), "https://antreme.kyiv.ua/1x:2.jpg");
    }

    #[test]
    fn test_image_fallback() {
        let defaults = OgDefaults {
            site_name: "Antreme",
            default_image: "/og-image.jpg",
            twitter_card: "summary_large_image",
        };
        assert_eq!(defaults.image(ORIGIN, None), "https://antreme.kyiv.ua/og-image.jpg");
        assert_eq!(defaults.image(ORIGIN, Some("  ")), "https://antreme.kyiv.ua/og-image.jpg");
        assert_eq!(
            defaults.image(ORIGIN, Some("/uploads/cake.webp")),
            "https://antreme.kyiv.ua/uploads/cake.webp"
        );
    }
}
