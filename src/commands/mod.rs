//! CLI subcommands

pub mod build;
pub mod clean;
pub mod fetch;
pub mod init;
pub mod list;
