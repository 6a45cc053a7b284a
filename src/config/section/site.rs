//! `[site]` section configuration.
//!
//! Identity of the deployed site and the shape of the SPA shell.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Antreme"
//! origin = "https://antreme.kyiv.ua"   # scheme + host, no path
//! dist = "dist"                        # SPA build output
//! mount_id = "root"                    # element the SPA renders into
//! nested_segment = "torty-na-zamovlennya"
//! default_image = "/og-image.jpg"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Site identity and template settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Site name, used in title/description fallbacks and `og:site_name`.
    pub name: String,

    /// Public origin, e.g. `https://example.com`. Canonical URLs are built on it.
    pub origin: String,

    /// SPA build output directory, relative to the config file.
    pub dist: PathBuf,

    /// Shared SPA shell. Defaults to `<dist>/index.html`.
    pub template: Option<PathBuf>,

    /// `id` of the element the SPA mounts into.
    pub mount_id: String,

    /// Parent segment for nested category pages.
    pub nested_segment: String,

    /// Social image used when a route has none. Root-relative or absolute.
    pub default_image: String,

    /// Robots directive for indexable routes.
    pub robots: String,

    /// `twitter:card` value.
    pub twitter_card: String,

    /// ISO 4217 currency for product offers.
    pub currency: String,
}

pub struct SiteFields {
    pub name: FieldPath,
    pub origin: FieldPath,
    pub mount_id: FieldPath,
    pub nested_segment: FieldPath,
    pub currency: FieldPath,
}

impl SiteSection {
    pub const FIELDS: SiteFields = SiteFields {
        name: FieldPath::new("site.name"),
        origin: FieldPath::new("site.origin"),
        mount_id: FieldPath::new("site.mount_id"),
        nested_segment: FieldPath::new("site.nested_segment"),
        currency: FieldPath::new("site.currency"),
    };
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: String::new(),
            origin: String::new(),
            dist: "dist".into(),
            template: None,
            mount_id: "root".into(),
            nested_segment: "torty-na-zamovlennya".into(),
            default_image: "/og-image.jpg".into(),
            robots: "index, follow".into(),
            twitter_card: "summary_large_image".into(),
            currency: "UAH".into(),
        }
    }
}

impl SiteSection {
    /// Origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.origin.trim_end_matches('/')
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `name` is set
    /// - `origin` is an http(s) URL with a host and no path, query or fragment
    /// - `mount_id` is a plain identifier
    /// - `nested_segment` is a single path segment
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error(Self::FIELDS.name, "site name is required");
        }

        self.validate_origin(diag);

        if self.mount_id.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.mount_id,
                "mount element id is empty",
                "most SPA templates use \"root\" or \"app\"",
            );
        } else if self
            .mount_id
            .contains(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
        {
            diag.error(
                Self::FIELDS.mount_id,
                format!("`{}` is not a valid element id", self.mount_id),
            );
        }

        let segment = self.nested_segment.trim_matches('/');
        if segment.is_empty() || segment.contains('/') {
            diag.error(
                Self::FIELDS.nested_segment,
                "nested segment must be a single non-empty path segment",
            );
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            diag.error_with_hint(
                Self::FIELDS.currency,
                format!("`{}` is not an ISO 4217 code", self.currency),
                "use an uppercase three-letter code, e.g. \"UAH\"",
            );
        }
    }

    fn validate_origin(&self, diag: &mut ConfigDiagnostics) {
        const HINT: &str = "use format like https://example.com";

        if self.origin.trim().is_empty() {
            diag.error_with_hint(Self::FIELDS.origin, "origin is required", HINT);
            return;
        }

        match url::Url::parse(&self.origin) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::FIELDS.origin,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        HINT,
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(Self::FIELDS.origin, "URL must have a valid host", HINT);
                }
                let has_path = crate::config::util::extract_url_path(&self.origin)
                    .is_some_and(|p| !p.is_empty());
                if has_path || parsed.query().is_some() || parsed.fragment().is_some() {
                    diag.error_with_hint(
                        Self::FIELDS.origin,
                        "origin must not contain a path, query or fragment",
                        HINT,
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(Self::FIELDS.origin, format!("invalid URL: {}", e), HINT);
            }
        }
    }
}
