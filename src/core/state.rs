//! Process-wide run state.
//!
//! Two orthogonal flags:
//! - `SESSION`: Is a snapshot session holding external resources? (server, browser)
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)

use std::sync::atomic::{AtomicBool, Ordering};

/// A snapshot session owns a child server and a browser
/// - `false`: Ctrl+C exits immediately
/// - `true`: Ctrl+C sets SHUTDOWN, the session stops after the current target
static SESSION: AtomicBool = AtomicBool::new(false);

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

// =============================================================================
// SESSION state
// =============================================================================

/// Mark a snapshot session as active. Ctrl+C now defers to session cleanup.
pub fn begin_session() {
    SESSION.store(true, Ordering::SeqCst);
}

/// Mark the session as finished. Ctrl+C exits immediately again.
pub fn end_session() {
    SESSION.store(false, Ordering::SeqCst);
}

pub fn is_session_active() -> bool {
    SESSION.load(Ordering::SeqCst)
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a session is active:
/// - No session: exit immediately, nothing to clean up
/// - Session active: set SHUTDOWN and let the session tear down the
///   browser and server before returning
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if is_session_active() {
            crate::log!("snapshot"; "interrupted, finishing current target then shutting down...");
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
///
/// Relaxed ordering: the flag is only read between targets.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session() {
        end_session();
        assert!(!is_session_active());

        begin_session();
        assert!(is_session_active());

        end_session();
        assert!(!is_session_active());
    }

    #[test]
    fn test_shutdown_default_off() {
        assert!(!is_shutdown());
    }
}
