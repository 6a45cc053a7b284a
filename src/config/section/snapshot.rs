//! `[snapshot]` section configuration.
//!
//! Controls the local preview server, the headless browser and the
//! list of routes that get hydrated snapshots.
//!
//! # Example
//!
//! ```toml
//! [snapshot]
//! command = ["npx", "vite", "preview", "--port", "$PORT", "--strictPort"]
//! port = 4173
//! targets = ["/", "/torty-na-zamovlennya/vesilni/"]
//! blocked_resources = ["image", "media", "font"]
//! ```
//!
//! `$PORT` in `command` is replaced with `port`.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::RoutePath;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Resource types the browser may be told to abort.
pub const KNOWN_RESOURCE_TYPES: &[&str] = &[
    "document",
    "stylesheet",
    "image",
    "media",
    "font",
    "script",
    "texttrack",
    "xhr",
    "fetch",
    "eventsource",
    "websocket",
    "manifest",
    "other",
];

/// Snapshot stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Static server command and arguments.
    pub command: Vec<String>,

    /// Working directory for the server. Defaults to the config file's directory.
    pub cwd: Option<PathBuf>,

    /// Port the server listens on.
    pub port: u16,

    /// Host used to reach the server.
    pub host: String,

    /// Server output substrings that mean "ready".
    pub ready_patterns: Vec<String>,

    /// Upper bound on waiting for a ready line.
    pub ready_timeout_secs: u64,

    /// Fixed wait after the server reports ready.
    pub settle_ms: u64,

    /// Upper bound on navigation plus network idle.
    pub navigation_timeout_secs: u64,

    /// Upper bound on waiting for the mount element to fill.
    pub mount_timeout_secs: u64,

    /// Wait after mount before capture.
    pub grace_ms: u64,

    /// Chrome/Chromium executable. Auto-detected when unset.
    pub chrome: Option<PathBuf>,

    /// Pass `--no-sandbox` to the browser.
    pub no_sandbox: bool,

    /// Extra browser command-line flags.
    pub browser_args: Vec<String>,

    /// Resource types aborted during rendering.
    pub blocked_resources: Vec<String>,

    /// Routes that get a hydrated snapshot.
    pub targets: Vec<RoutePath>,

    /// Run the verification pass after snapshotting.
    pub verify: bool,
}

pub struct SnapshotFields {
    pub command: FieldPath,
    pub port: FieldPath,
    pub ready_patterns: FieldPath,
    pub timeouts: FieldPath,
    pub blocked_resources: FieldPath,
    pub targets: FieldPath,
}

impl SnapshotConfig {
    pub const FIELDS: SnapshotFields = SnapshotFields {
        command: FieldPath::new("snapshot.command"),
        port: FieldPath::new("snapshot.port"),
        ready_patterns: FieldPath::new("snapshot.ready_patterns"),
        timeouts: FieldPath::new("snapshot.*_timeout_secs"),
        blocked_resources: FieldPath::new("snapshot.blocked_resources"),
        targets: FieldPath::new("snapshot.targets"),
    };
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            command: ["npx", "vite", "preview", "--port", "$PORT", "--strictPort"]
                .map(String::from)
                .to_vec(),
            cwd: None,
            port: 4173,
            host: "127.0.0.1".into(),
            ready_patterns: vec!["http://".into(), "Local:".into()],
            ready_timeout_secs: 15,
            settle_ms: 2000,
            navigation_timeout_secs: 30,
            mount_timeout_secs: 15,
            grace_ms: 2000,
            chrome: None,
            no_sandbox: true,
            browser_args: Vec::new(),
            blocked_resources: vec!["image".into(), "media".into(), "font".into()],
            targets: Vec::new(),
            verify: true,
        }
    }
}

impl SnapshotConfig {
    /// Server command with `$PORT` substituted.
    pub fn resolved_command(&self) -> Vec<String> {
        let port = self.port.to_string();
        self.command
            .iter()
            .map(|arg| arg.replace("$PORT", &port))
            .collect()
    }

    /// `http://<host>:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn mount_timeout(&self) -> Duration {
        Duration::from_secs(self.mount_timeout_secs)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.command.first().is_none_or(|program| program.trim().is_empty()) {
            diag.error_with_hint(
                Self::FIELDS.command,
                "server command is empty",
                "e.g. [\"npx\", \"vite\", \"preview\", \"--port\", \"$PORT\"]",
            );
        }

        if self.port == 0 {
            diag.error(Self::FIELDS.port, "port must be greater than 0");
        }

        if self.ready_patterns.iter().all(|p| p.is_empty()) {
            diag.error(
                Self::FIELDS.ready_patterns,
                "at least one non-empty ready pattern is required",
            );
        }

        if self.ready_timeout_secs == 0
            || self.navigation_timeout_secs == 0
            || self.mount_timeout_secs == 0
        {
            diag.error(Self::FIELDS.timeouts, "timeouts must be greater than 0");
        }

        for kind in &self.blocked_resources {
            if !KNOWN_RESOURCE_TYPES.contains(&kind.to_ascii_lowercase().as_str()) {
                diag.error_with_hint(
                    Self::FIELDS.blocked_resources,
                    format!("unknown resource type `{}`", kind),
                    format!("expected one of: {}", KNOWN_RESOURCE_TYPES.join(", ")),
                );
            }
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for target in &self.targets {
            if !seen.insert(target) {
                diag.warn(
                    Self::FIELDS.targets,
                    format!("`{}` listed more than once", target),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_snapshot_defaults() {
        let config = test_parse_config("");
        let snapshot = &config.snapshot;

        assert_eq!(snapshot.port, 4173);
        assert_eq!(snapshot.ready_timeout(), Duration::from_secs(15));
        assert_eq!(snapshot.settle(), Duration::from_millis(2000));
        assert_eq!(snapshot.navigation_timeout(), Duration::from_secs(30));
        assert_eq!(snapshot.mount_timeout(), Duration::from_secs(15));
        assert_eq!(snapshot.grace(), Duration::from_millis(2000));
        assert_eq!(snapshot.blocked_resources, ["image", "media", "font"]);
        assert!(snapshot.targets.is_empty());
    }

    #[test]
    fn test_resolved_command_substitutes_port() {
        let config = test_parse_config("[snapshot]\nport = 5000");
        assert_eq!(
            config.snapshot.resolved_command(),
            ["npx", "vite", "preview", "--port", "5000", "--strictPort"]
        );
        assert_eq!(config.snapshot.base_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_targets_normalized() {
        let config = test_parse_config(
            "[snapshot]\ntargets = [\"/\", \"torty-na-zamovlennya/vesilni\"]",
        );
        assert_eq!(config.snapshot.targets[0], "/");
        assert_eq!(config.snapshot.targets[1], "/torty-na-zamovlennya/vesilni/");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = test_parse_config(
            "[snapshot]\ncommand = []\nmount_timeout_secs = 0\nblocked_resources = [\"pictures\"]",
        );
        let mut diag = ConfigDiagnostics::new();
        config.snapshot.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_validate_duplicate_targets_warn() {
        let config = test_parse_config("[snapshot]\ntargets = [\"/about\", \"/about/\"]");
        let mut diag = ConfigDiagnostics::new();
        config.snapshot.validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}
