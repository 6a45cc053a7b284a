//! `snapshot` and `verify`.
//!
//! Per-target failures and verification findings are reported, never fatal.

use crate::config::SiteConfig;
use crate::snapshot::{SnapshotSummary, run_snapshot, verify};
use anyhow::Result;

/// Replace the configured targets with hydrated snapshots.
pub async fn snapshot_site(config: &SiteConfig) -> Result<SnapshotSummary> {
    run_snapshot(config).await
}

/// Print verification findings for the configured targets.
pub fn verify_site(config: &SiteConfig) -> Result<()> {
    verify(config).print();
    Ok(())
}
