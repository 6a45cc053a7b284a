//! Snapshot session lifecycle.
//!
//! ```text
//! Idle ─► ServerStarting ─► ServerReady ─► BrowserLaunching ─► BrowserReady
//!                                                                  │
//!                                           ┌──────────────────────┤
//!                                           ▼                      │
//!                                       Rendering ◄────────────────┘
//!                                           │
//!   (any state) ────────────────────► ShuttingDown ─► Terminated
//! ```

use crate::core::RoutePath;
use crate::debug;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ServerStarting,
    ServerReady,
    BrowserLaunching,
    BrowserReady,
    Rendering(RoutePath),
    ShuttingDown,
    Terminated,
}

impl Phase {
    /// Whether `self -> next` is a legal transition.
    pub fn can_advance_to(&self, next: &Phase) -> bool {
        use Phase::*;
        match (self, next) {
            (Terminated, _) => false,
            (ShuttingDown, Terminated) => true,
            (ShuttingDown, _) => false,
            (_, ShuttingDown) => true,
            (Idle, ServerStarting)
            | (ServerStarting, ServerReady)
            | (ServerReady, BrowserLaunching)
            | (BrowserLaunching, BrowserReady)
            | (BrowserReady, Rendering(_))
            | (Rendering(_), Rendering(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::ServerStarting => f.write_str("server-starting"),
            Self::ServerReady => f.write_str("server-ready"),
            Self::BrowserLaunching => f.write_str("browser-launching"),
            Self::BrowserReady => f.write_str("browser-ready"),
            Self::Rendering(path) => write!(f, "rendering {path}"),
            Self::ShuttingDown => f.write_str("shutting-down"),
            Self::Terminated => f.write_str("terminated"),
        }
    }
}

/// Tracks the current phase and the per-target tallies.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    pub rendered: usize,
    pub failed: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            rendered: 0,
            failed: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Move to `next`. Illegal transitions are bugs.
    pub fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_advance_to(&next),
            "illegal snapshot transition: {} -> {}",
            self.phase,
            next
        );
        debug!("snapshot"; "{} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Enter `ShuttingDown` unless already there or done.
    pub fn shut_down(&mut self) {
        if !matches!(self.phase, Phase::ShuttingDown | Phase::Terminated) {
            self.advance(Phase::ShuttingDown);
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut session = Session::new();
        session.advance(Phase::ServerStarting);
        session.advance(Phase::ServerReady);
        session.advance(Phase::BrowserLaunching);
        session.advance(Phase::BrowserReady);
        session.advance(Phase::Rendering(RoutePath::root()));
        session.advance(Phase::Rendering(RoutePath::new("/bento-torty/")));
        session.shut_down();
        session.advance(Phase::Terminated);
        assert!(session.is_terminated());
    }

    #[test]
    fn test_any_state_can_shut_down() {
        for phase in [
            Phase::Idle,
            Phase::ServerStarting,
            Phase::ServerReady,
            Phase::BrowserLaunching,
            Phase::BrowserReady,
            Phase::Rendering(RoutePath::root()),
        ] {
            assert!(phase.can_advance_to(&Phase::ShuttingDown), "{phase}");
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!Phase::Idle.can_advance_to(&Phase::BrowserReady));
        assert!(!Phase::ServerReady.can_advance_to(&Phase::Rendering(RoutePath::root())));
        assert!(!Phase::ShuttingDown.can_advance_to(&Phase::ServerStarting));
        assert!(!Phase::Terminated.can_advance_to(&Phase::ShuttingDown));
        assert!(!Phase::Idle.can_advance_to(&Phase::Terminated));
    }

    #[test]
    fn test_shut_down_is_idempotent() {
        let mut session = Session::new();
        session.shut_down();
        session.shut_down();
        assert_eq!(session.phase(), &Phase::ShuttingDown);
    }

    #[test]
    #[should_panic(expected = "illegal snapshot transition")]
    #[cfg(debug_assertions)]
    fn test_illegal_advance_panics_in_debug() {
        let mut session = Session::new();
        session.advance(Phase::BrowserReady);
    }
}
