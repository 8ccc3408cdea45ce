//! CLI module
//!
//! Command-line interface for extracting playlists.
//!
//! # Commands
//!
//! - `info` - Extract a playlist (first page or full list)
//! - `more` - Fetch the page a cursor points to
//! - `services` - List built-in services

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
