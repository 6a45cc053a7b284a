//! `[catalog]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [catalog]
//! url = "https://cake-shop-backend.onrender.com/cakes/"
//! page_size = 1000        # sent as ?limit=
//! timeout_secs = 60       # whole request, including body
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote catalog API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Fetch catalog items at all. `--no-catalog` turns this off.
    pub enable: bool,

    /// Listing endpoint. No fetch happens when unset.
    pub url: Option<String>,

    /// Value of the `limit` query parameter.
    pub page_size: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

pub struct CatalogFields {
    pub url: FieldPath,
    pub page_size: FieldPath,
    pub timeout_secs: FieldPath,
}

impl CatalogConfig {
    pub const FIELDS: CatalogFields = CatalogFields {
        url: FieldPath::new("catalog.url"),
        page_size: FieldPath::new("catalog.page_size"),
        timeout_secs: FieldPath::new("catalog.timeout_secs"),
    };

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint to fetch from, `None` when fetching is off or unconfigured.
    pub fn endpoint(&self) -> Option<&str> {
        self.url.as_deref().filter(|_| self.enable)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url) = &self.url {
            match url::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => diag.error(
                    Self::FIELDS.url,
                    format!("scheme '{}' not supported, must be http or https", parsed.scheme()),
                ),
                Err(e) => diag.error(Self::FIELDS.url, format!("invalid URL: {}", e)),
            }
        }
        if self.page_size == 0 {
            diag.error(Self::FIELDS.page_size, "page size must be greater than 0");
        }
        if self.timeout_secs == 0 {
            diag.error(Self::FIELDS.timeout_secs, "timeout must be greater than 0");
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enable: true,
            url: None,
            page_size: 1000,
            timeout_secs: 60,
        }
    }
}
