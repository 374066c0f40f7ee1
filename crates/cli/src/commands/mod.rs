//! CLI subcommands.

pub mod menu;
pub mod migrate;
pub mod summary;
