//! Headless Chromium over CDP.
//!
//! One browser for the session, one fresh tab per target. Requests are
//! intercepted per tab so heavy resources (images, media, fonts) never load.

use super::SnapshotError;
use super::probe::poll_until;
use crate::config::SnapshotConfig;
use crate::{debug, log};
use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, LoaderId};
use chromiumoxide::cdp::browser_protocol::page::{EventLifecycleEvent, FrameId, NavigateParams};
use chromiumoxide::Page;
use futures_util::StreamExt;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::task::JoinHandle;

const MOUNT_POLL_INTERVAL: Duration = Duration::from_millis(200);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);
const NETWORK_IDLE: &str = "networkAlmostIdle";

/// Head-manager attributes left behind by some SPA libraries.
static N_HEAD_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+data-n-head\s*=\s*"[^"]*""#).unwrap());

/// A launched browser and its CDP event loop.
pub struct SnapshotBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl SnapshotBrowser {
    pub async fn launch(config: &SnapshotConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(config.navigation_timeout())
            .window_size(1280, 800)
            .enable_request_intercept();
        if let Some(chrome) = &config.chrome {
            builder = builder.chrome_executable(chrome);
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        for arg in &config.browser_args {
            builder = builder.arg(arg.as_str());
        }
        let browser_config = builder.build().map_err(SnapshotError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SnapshotError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser"; "handler: {}", e);
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Render `url` and return the hydrated document.
    ///
    /// The tab is closed and its interception task stopped on every path.
    pub async fn render(&self, url: &str, config: &SnapshotConfig, mount_id: &str) -> Result<String> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to open a tab")?;

        let interceptor = spawn_interceptor(&page, &config.blocked_resources).await;
        let result = match interceptor {
            Ok(_) => capture(&page, url, config, mount_id).await,
            Err(ref e) => Err(anyhow::anyhow!("failed to intercept requests: {e:#}")),
        };

        if let Ok(task) = interceptor {
            task.abort();
        }
        if let Err(e) = page.close().await {
            debug!("browser"; "failed to close tab: {}", e);
        }
        result
    }

    /// Close the browser, killing it if it does not exit in time.
    pub async fn close(mut self) {
        let closed = tokio::time::timeout(CLOSE_TIMEOUT, async {
            self.browser.close().await?;
            self.browser.wait().await?;
            anyhow::Ok(())
        })
        .await;

        match closed {
            Ok(Ok(())) => debug!("browser"; "closed"),
            Ok(Err(e)) => {
                log!("warn"; "browser did not close cleanly: {:#}", e);
                self.kill().await;
            }
            Err(_) => {
                log!("warn"; "browser did not close within {}s, killing", CLOSE_TIMEOUT.as_secs());
                self.kill().await;
            }
        }
        self.handler.abort();
    }

    async fn kill(&mut self) {
        if let Some(Err(e)) = self.browser.kill().await {
            log!("warn"; "failed to kill browser: {}", e);
        }
    }
}

/// Answer every paused request: abort blocked resource types, continue the rest.
async fn spawn_interceptor(page: &Page, blocked: &[String]) -> Result<JoinHandle<()>> {
    let mut paused = page.event_listener::<EventRequestPaused>().await?;
    let page = page.clone();
    let blocked: Arc<[String]> = blocked.iter().map(|b| b.to_ascii_lowercase()).collect();

    Ok(tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let kind = event.resource_type.as_ref().to_ascii_lowercase();
            let answer = if blocked.contains(&kind) {
                page.execute(FailRequestParams::new(
                    event.request_id.clone(),
                    ErrorReason::BlockedByClient,
                ))
                .await
                .map(|_| ())
            } else {
                page.execute(ContinueRequestParams::new(event.request_id.clone()))
                    .await
                    .map(|_| ())
            };
            if let Err(e) = answer {
                debug!("browser"; "request {} not answered: {}", event.request.url, e);
            }
        }
    }))
}

async fn capture(page: &Page, url: &str, config: &SnapshotConfig, mount_id: &str) -> Result<String> {
    let mut lifecycle = page.event_listener::<EventLifecycleEvent>().await?;

    let navigation = async {
        let response = page.execute(NavigateParams::new(url)).await?;
        if let Some(error) = &response.result.error_text {
            anyhow::bail!("navigation failed: {error}");
        }
        let navigation = Navigation {
            frame_id: response.result.frame_id.clone(),
            loader_id: response.result.loader_id.clone(),
        };
        while let Some(event) = lifecycle.next().await {
            if navigation.is_idle(&event.name, &event.frame_id, &event.loader_id) {
                break;
            }
        }
        anyhow::Ok(())
    };
    tokio::time::timeout(config.navigation_timeout(), navigation)
        .await
        .map_err(|_| SnapshotError::NavigationTimeout(config.navigation_timeout_secs))?
        .with_context(|| format!("failed to load {url}"))?;

    let script = mount_check_script(mount_id);
    let script = script.as_str();
    let mounted = poll_until(config.mount_timeout(), MOUNT_POLL_INTERVAL, || async move {
        let value = page.evaluate(script).await?;
        Ok(value.into_value::<bool>().unwrap_or(false))
    })
    .await?;
    if !mounted.is_ready() {
        return Err(SnapshotError::MountTimeout(config.mount_timeout_secs).into());
    }

    tokio::time::sleep(config.grace()).await;

    let html = page.content().await.context("failed to read the document")?;
    Ok(clean_snapshot(&html))
}

/// The frame and document a navigation loads.
struct Navigation {
    frame_id: FrameId,
    /// `None` for same-document navigations.
    loader_id: Option<LoaderId>,
}

impl Navigation {
    /// Network idle for this navigation's document. Events from other frames
    /// or from the previous document (`about:blank`) don't count.
    fn is_idle(&self, name: &str, frame_id: &FrameId, loader_id: &LoaderId) -> bool {
        name == NETWORK_IDLE
            && *frame_id == self.frame_id
            && self.loader_id.as_ref().is_none_or(|loader| loader == loader_id)
    }
}

/// JS expression: does the mount element have at least one element child?
fn mount_check_script(mount_id: &str) -> String {
    let id = serde_json::to_string(mount_id).unwrap_or_else(|_| "\"root\"".into());
    format!("(() => {{ const el = document.getElementById({id}); return !!el && el.children.length > 0; }})()")
}

/// Strip head-manager artifacts from a captured document.
pub fn clean_snapshot(html: &str) -> String {
    N_HEAD_ATTR.replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_snapshot() {
        let html = r#"<title data-n-head="ssr">A</title><meta data-n-head="1" name="x" content="y">"#;
        assert_eq!(clean_snapshot(html), r#"<title>A</title><meta name="x" content="y">"#);
    }

    #[test]
    fn test_clean_snapshot_keeps_other_attributes() {
        let html = r#"<div data-rh="true" data-n-header="x">ok</div>"#;
        assert_eq!(clean_snapshot(html), html);
    }

    #[test]
    fn test_idle_only_for_navigated_document() {
        let main = FrameId::new("main");
        let navigation = Navigation {
            frame_id: main.clone(),
            loader_id: Some(LoaderId::new("doc-2")),
        };
        let doc = LoaderId::new("doc-2");

        assert!(navigation.is_idle(NETWORK_IDLE, &main, &doc));
        assert!(!navigation.is_idle("load", &main, &doc));
        assert!(!navigation.is_idle(NETWORK_IDLE, &FrameId::new("iframe"), &doc));
        assert!(!navigation.is_idle(NETWORK_IDLE, &main, &LoaderId::new("blank")));

        let same_document = Navigation {
            frame_id: main.clone(),
            loader_id: None,
        };
        assert!(same_document.is_idle(NETWORK_IDLE, &main, &LoaderId::new("any")));
    }

    #[test]
    fn test_mount_check_script_quotes_id() {
        let script = mount_check_script("root");
        assert!(script.contains(r#"getElementById("root")"#));
        assert!(script.contains("children.length > 0"));

        let script = mount_check_script(r#"a"b"#);
        assert!(script.contains(r#"getElementById("a\"b")"#));
    }
}
