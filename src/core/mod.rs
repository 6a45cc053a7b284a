//! Core types - pure abstractions shared across the codebase.

mod path;
mod state;

pub use path::RoutePath;
pub use state::{begin_session, end_session, is_shutdown, setup_shutdown_handler};

#[cfg(test)]
pub use state::is_session_active;
