//! Command-line interface module.

mod args;
pub mod build;
pub mod generate;
pub mod snapshot;

pub use args::{Cli, Commands};
