//! Utility modules shared by both stages.

pub mod date;
pub mod fs;
pub mod html;
mod plural;

pub use plural::plural_count;
