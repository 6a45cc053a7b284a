//! Stage 2: hydrated snapshots.
//!
//! Serves the built SPA locally, renders each configured target in headless
//! Chromium and overwrites its stage-1 document with the hydrated DOM.
//!
//! ```text
//! PreviewServer ──► SnapshotBrowser ──► target₁ ─► write
//!                                   ──► target₂ ─► write
//!                                   ...
//! cleanup (always): close browser, kill server
//! verify: read documents back, report
//! ```
//!
//! Targets render one at a time. A failing target keeps its stage-1 document.

mod browser;
mod probe;
mod server;
mod session;
pub mod verify;

pub use verify::{VerifyReport, verify_targets};

use crate::config::SiteConfig;
use crate::core::{RoutePath, begin_session, end_session, is_shutdown};
use crate::utils::fs::write_atomic;
use crate::utils::plural_count;
use crate::{debug, log};
use anyhow::Result;
use browser::SnapshotBrowser;
use server::PreviewServer;
use session::{Phase, Session};
use thiserror::Error;

/// Snapshot stage failures.
///
/// Server and browser start-up errors end the session. Per-target errors
/// are logged and counted.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to start server: {0}")]
    ServerSpawn(String),

    #[error("server exited before it was ready ({0})")]
    ServerExited(String),

    #[error("failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("page did not finish loading within {0}s")]
    NavigationTimeout(u64),

    #[error("mount element stayed empty for {0}s")]
    MountTimeout(u64),
}

/// Outcome of a snapshot run.
#[derive(Debug, Default)]
pub struct SnapshotSummary {
    pub rendered: usize,
    pub failed: usize,
    /// Stopped early by Ctrl+C.
    pub interrupted: bool,
    pub verify: Option<VerifyReport>,
}

/// External resources held by the session, released in cleanup.
#[derive(Default)]
struct Resources {
    server: Option<PreviewServer>,
    browser: Option<SnapshotBrowser>,
}

/// Run the snapshot stage for `snapshot.targets`.
pub async fn run_snapshot(config: &SiteConfig) -> Result<SnapshotSummary> {
    let targets = &config.snapshot.targets;
    if targets.is_empty() {
        log!("snapshot"; "no targets configured, nothing to do");
        return Ok(SnapshotSummary::default());
    }

    begin_session();
    let mut session = Session::new();
    let mut resources = Resources::default();

    let result = render_targets(config, targets, &mut session, &mut resources).await;
    cleanup(&mut session, resources).await;
    end_session();
    result?;

    let mut summary = SnapshotSummary {
        rendered: session.rendered,
        failed: session.failed,
        interrupted: is_shutdown(),
        verify: None,
    };
    log!(
        "snapshot";
        "{} rendered, {} failed{}",
        plural_count(summary.rendered, "target"),
        summary.failed,
        if summary.interrupted { " (interrupted)" } else { "" }
    );

    if config.snapshot.verify {
        let report = verify(config);
        report.print();
        summary.verify = Some(report);
    }
    Ok(summary)
}

/// Verification pass over `snapshot.targets`.
pub fn verify(config: &SiteConfig) -> VerifyReport {
    verify_targets(config.dist(), &config.snapshot.targets, &config.site.mount_id)
}

async fn render_targets(
    config: &SiteConfig,
    targets: &[RoutePath],
    session: &mut Session,
    resources: &mut Resources,
) -> Result<()> {
    let snapshot = &config.snapshot;

    session.advance(Phase::ServerStarting);
    log!("server"; "{}", snapshot.resolved_command().join(" "));
    let server = resources
        .server
        .insert(PreviewServer::spawn(snapshot, config.snapshot_cwd())?);
    server
        .wait_ready(snapshot.ready_timeout(), snapshot.settle())
        .await?;
    session.advance(Phase::ServerReady);

    if is_shutdown() {
        return Ok(());
    }

    session.advance(Phase::BrowserLaunching);
    let browser = resources
        .browser
        .insert(SnapshotBrowser::launch(snapshot).await?);
    session.advance(Phase::BrowserReady);
    debug!("browser"; "launched");

    let base = snapshot.base_url();
    for target in targets {
        if is_shutdown() {
            log!("snapshot"; "stopping before {}", target);
            break;
        }
        session.advance(Phase::Rendering(target.clone()));

        let url = format!("{}{}", base, target.to_encoded());
        let output = target.output_file(config.dist());
        let result = match browser.render(&url, snapshot, &config.site.mount_id).await {
            Ok(html) => write_atomic(&output, &html),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                session.rendered += 1;
                log!("snapshot"; "{}", target);
            }
            Err(e) => {
                session.failed += 1;
                log!("error"; "{}: {:#}", target, e);
            }
        }
    }
    Ok(())
}

/// Release the browser and the server, whatever state the session is in.
async fn cleanup(session: &mut Session, resources: Resources) {
    session.shut_down();
    if let Some(browser) = resources.browser {
        browser.close().await;
    }
    if let Some(server) = resources.server
        && let Err(e) = server.shutdown().await
    {
        log!("warn"; "failed to stop server: {:#}", e);
    }
    session.advance(Phase::Terminated);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[tokio::test]
    async fn test_no_targets_is_a_no_op() {
        let config = test_parse_config("");
        let summary = run_snapshot(&config).await.unwrap();
        assert_eq!(summary.rendered, 0);
        assert!(summary.verify.is_none());
    }

    #[tokio::test]
    async fn test_server_spawn_failure_is_an_error_and_cleans_up() {
        let mut config = test_parse_config("[snapshot]\ntargets = [\"/\"]");
        config.snapshot.command = vec!["definitely-not-a-real-server-binary".into()];
        config.snapshot.cwd = Some(std::env::temp_dir());

        let err = run_snapshot(&config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SnapshotError>(),
            Some(SnapshotError::ServerSpawn(_))
        ));
        assert!(!crate::core::is_session_active());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SnapshotError::MountTimeout(15).to_string(),
            "mount element stayed empty for 15s"
        );
        assert_eq!(
            SnapshotError::ServerExited("exit status: 1".into()).to_string(),
            "server exited before it was ready (exit status: 1)"
        );
    }
}
