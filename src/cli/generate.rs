//! `generate`: metadata-complete documents for every route.

use crate::catalog::fetch_catalog;
use crate::config::SiteConfig;
use crate::log;
use crate::pipeline::{Synthesis, synthesize};
use anyhow::Result;

/// Fetch the catalog, then write every route document, the 404 page and
/// the sitemap.
pub async fn generate_site(config: &SiteConfig) -> Result<Synthesis> {
    let items = fetch_catalog(&config.catalog).await;
    let synthesis = synthesize(config, &items)?;

    let mut extras = Vec::new();
    if let Some(path) = &synthesis.not_found {
        extras.push(config.root_relative(path).display().to_string());
    }
    if let Some(path) = &synthesis.sitemap {
        extras.push(config.root_relative(path).display().to_string());
    }
    log!(
        "generate";
        "{}/{} documents written{}",
        synthesis.written,
        synthesis.routes,
        if extras.is_empty() {
            String::new()
        } else {
            format!(" (+ {})", extras.join(", "))
        }
    );
    Ok(synthesis)
}
