//! Local static server for the built SPA.
//!
//! The server is an external command (by default `vite preview`). Readiness
//! is read off its output: any line containing a ready pattern counts.

use super::SnapshotError;
use super::probe::{Poll, poll_until};
use crate::config::SnapshotConfig;
use crate::{debug, log};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const EXIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Running server process and its output readers.
pub struct PreviewServer {
    child: Child,
    ready: Arc<AtomicBool>,
    readers: Vec<JoinHandle<()>>,
    program: String,
}

impl PreviewServer {
    /// Spawn the configured command in `cwd`.
    pub fn spawn(config: &SnapshotConfig, cwd: &Path) -> Result<Self> {
        let command = config.resolved_command();
        let Some((program, args)) = command.split_first() else {
            return Err(SnapshotError::ServerSpawn("server command is empty".into()).into());
        };

        let resolved = which::which(program)
            .map_err(|_| SnapshotError::ServerSpawn(format!("`{program}` not found in PATH")))?;
        debug!("server"; "{} {}", resolved.display(), args.join(" "));

        let mut cmd = Command::new(&resolved);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so wrappers like npx don't leave the real server behind
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd
            .spawn()
            .map_err(|e| SnapshotError::ServerSpawn(format!("failed to start `{program}`: {e}")))?;

        let ready = Arc::new(AtomicBool::new(false));
        let patterns: Arc<[String]> = config
            .ready_patterns
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect();

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, patterns.clone(), ready.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, patterns, ready.clone()));
        }

        Ok(Self {
            child,
            ready,
            readers,
            program: program.clone(),
        })
    }

    /// Wait for a ready line, then settle.
    ///
    /// Timing out is not an error: some servers print nothing recognizable.
    /// The server exiting first is.
    pub async fn wait_ready(&mut self, timeout: Duration, settle: Duration) -> Result<()> {
        let ready = self.ready.clone();
        let child = &mut self.child;

        let poll = poll_until(timeout, POLL_INTERVAL, || {
            let state: Result<bool> = match child.try_wait() {
                Ok(Some(status)) => Err(SnapshotError::ServerExited(status.to_string()).into()),
                Ok(None) => Ok(ready.load(Ordering::Acquire)),
                Err(e) => Err(anyhow::Error::from(e).context("failed to poll server process")),
            };
            async move { state }
        })
        .await?;

        match poll {
            Poll::Ready => debug!("server"; "ready"),
            Poll::TimedOut => {
                log!("warn"; "no ready line from `{}` within {}s, continuing", self.program, timeout.as_secs());
            }
        }

        tokio::time::sleep(settle).await;
        Ok(())
    }

    /// Kill the process and wait for it to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        if self.child.try_wait()?.is_none() {
            #[cfg(unix)]
            if let Some(pid) = self.child.id()
                && kill_process_group(pid)
            {
                debug!("server"; "killed process group {}", pid);
            }
            self.child.start_kill().context("failed to kill server")?;
            match tokio::time::timeout(EXIT_TIMEOUT, self.child.wait()).await {
                Ok(status) => {
                    let status = status?;
                    debug!("server"; "exited: {}", status);
                }
                Err(_) => log!("warn"; "server did not exit within {}s", EXIT_TIMEOUT.as_secs()),
            }
        }
        for reader in self.readers.drain(..) {
            reader.abort();
        }
        Ok(())
    }
}

/// SIGKILL the whole group led by `pid`. Returns whether `kill` succeeded.
///
/// A failure here can leave the real server running behind its wrapper.
#[cfg(unix)]
fn kill_process_group(pid: u32) -> bool {
    let status = std::process::Command::new("kill")
        .args(["-KILL", "--", &format!("-{pid}")])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log!("warn"; "failed to kill server process group {} ({}), it may still be running", pid, status);
            false
        }
        Err(e) => {
            log!("warn"; "failed to kill server process group {}: {}, it may still be running", pid, e);
            false
        }
    }
}

fn spawn_reader<R>(stream: R, patterns: Arc<[String]>, ready: Arc<AtomicBool>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let plain = strip_ansi(&line);
            let plain = plain.trim();
            if plain.is_empty() {
                continue;
            }
            debug!("server"; "{}", plain);
            if is_ready_line(plain, &patterns) {
                ready.store(true, Ordering::Release);
            }
        }
    })
}

/// Whether `line` contains any ready pattern.
pub fn is_ready_line(line: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| !p.is_empty() && line.contains(p.as_str()))
}

/// Strip ANSI escape sequences.
pub fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap());
    re.replace_all(s, "")
}
