//! Subcommand implementations

pub mod inspect;
pub mod model;
pub mod predict;
