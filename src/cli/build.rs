//! `build`: generate, then snapshot.

use super::generate::generate_site;
use super::snapshot::snapshot_site;
use crate::config::SiteConfig;
use crate::core::is_shutdown;
use crate::log;
use anyhow::Result;

/// Run both stages. Snapshots overwrite stage-1 documents, so generation
/// must succeed first.
pub async fn build_site(config: &SiteConfig) -> Result<()> {
    generate_site(config).await?;

    if is_shutdown() {
        log!("build"; "interrupted, skipping snapshots");
        return Ok(());
    }
    snapshot_site(config).await.map(|_| ())
}
