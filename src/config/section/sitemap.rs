//! Sitemap and not-found document configuration.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// `[sitemap]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Enable sitemap generation
    pub enable: bool,
    /// Output path, relative to the dist directory
    pub path: PathBuf,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "sitemap.xml".into(),
        }
    }
}

impl SitemapConfig {
    pub const FIELD_PATH: FieldPath = FieldPath::new("sitemap.path");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !is_plain_relative(&self.path) {
            diag.error(
                Self::FIELD_PATH,
                "must be a relative path inside the dist directory",
            );
        }
    }
}

/// `[not_found]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotFoundConfig {
    /// Write the hardened not-found document
    pub enable: bool,
    /// Document title
    pub title: String,
    /// Output path, relative to the dist directory
    pub path: PathBuf,
}

impl Default for NotFoundConfig {
    fn default() -> Self {
        Self {
            enable: true,
            title: "Page not found".into(),
            path: "404.html".into(),
        }
    }
}

impl NotFoundConfig {
    pub const FIELD_PATH: FieldPath = FieldPath::new("not_found.path");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !is_plain_relative(&self.path) {
            diag.error(
                Self::FIELD_PATH,
                "must be a relative path inside the dist directory",
            );
        }
    }
}

/// Relative, non-empty, and never escaping its base with `..`.
fn is_plain_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.sitemap.enable);
        assert_eq!(config.sitemap.path, PathBuf::from("sitemap.xml"));
        assert!(config.not_found.enable);
        assert_eq!(config.not_found.path, PathBuf::from("404.html"));
    }

    #[test]
    fn test_custom_not_found_title() {
        let config = test_parse_config("[not_found]\ntitle = \"Сторінку не знайдено\"");
        assert_eq!(config.not_found.title, "Сторінку не знайдено");
    }

    #[test]
    fn test_paths_must_stay_inside_dist() {
        let config = test_parse_config("[sitemap]\npath = \"../sitemap.xml\"\n[not_found]\npath = \"/404.html\"");
        let mut diag = ConfigDiagnostics::new();
        config.sitemap.validate(&mut diag);
        config.not_found.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
