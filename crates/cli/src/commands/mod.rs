//! Subcommand implementations

pub mod detect;
pub mod simulate;
pub mod summary;
