//! Pipeline configuration management for `prerender.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── catalog    # [catalog]
//! │   ├── sitemap    # [sitemap], [not_found]
//! │   ├── snapshot   # [snapshot]
//! │   └── content    # [[pages]], [[categories]], [seo.<key>]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! The config is loaded once in `main` and passed down as `&SiteConfig`.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    CatalogConfig, CategoryConfig, CategoryGroup, NotFoundConfig, PageConfig, SeoCopy,
    SiteSection, SitemapConfig, SnapshotConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, core::RoutePath, log, utils::fs::expand_path};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing prerender.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub sitemap: SitemapConfig,

    #[serde(default)]
    pub not_found: NotFoundConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Static pages, in declaration order
    #[serde(default)]
    pub pages: Vec<PageConfig>,

    /// Storage category to URL mapping, in declaration order
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,

    /// Category landing copy keyed by storage category
    #[serde(default)]
    pub seo: FxHashMap<String, SeoCopy>,
}

impl SiteConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory; relative paths resolve against it.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cli.config, &cwd)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = crate::utils::fs::normalize_path(&config_path);
        config.apply_cli(cli);
        config.finalize();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides on top of the file contents.
    fn apply_cli(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.common().verbose);

        Self::update_option(&mut self.site.dist, cli.output.as_ref());

        if let Some(args) = cli.generate_args() {
            if args.no_catalog {
                self.catalog.enable = false;
            }
            Self::update_option(&mut self.site.origin, args.origin.as_ref());
        }

        if let Some(args) = cli.snapshot_args()
            && !args.targets.is_empty()
        {
            self.snapshot.targets = args.targets.iter().map(|t| RoutePath::new(t)).collect();
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve the root and make every configured path absolute.
    fn finalize(&mut self) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.root = crate::utils::fs::normalize_path(&root);

        self.site.dist = expand_path(&self.site.dist, &self.root);
        self.site.template = self
            .site
            .template
            .take()
            .map(|t| expand_path(&t, &self.root));
        self.snapshot.cwd = Some(match self.snapshot.cwd.take() {
            Some(cwd) => expand_path(&cwd, &self.root),
            None => self.root.clone(),
        });
        self.snapshot.chrome = self
            .snapshot
            .chrome
            .take()
            .map(|c| expand_path(&c, &self.root));
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// SPA build output directory.
    pub fn dist(&self) -> &Path {
        &self.site.dist
    }

    /// Shared SPA shell, `<dist>/index.html` unless configured.
    pub fn template_path(&self) -> PathBuf {
        self.site
            .template
            .clone()
            .unwrap_or_else(|| self.site.dist.join("index.html"))
    }

    /// Working directory for the snapshot server.
    pub fn snapshot_cwd(&self) -> &Path {
        self.snapshot.cwd.as_deref().unwrap_or(&self.root)
    }

    /// Path relative to the project root, for log lines.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the whole configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.catalog.validate(&mut diag);
        self.sitemap.validate(&mut diag);
        self.not_found.validate(&mut diag);
        self.snapshot.validate(&mut diag);
        section::content::validate_pages(&self.pages, &mut diag);
        section::content::validate_categories(&self.categories, &self.seo, &mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!(
        "[site]\nname = \"Antreme\"\norigin = \"https://antreme.kyiv.ua\"\n{extra}"
    );
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
