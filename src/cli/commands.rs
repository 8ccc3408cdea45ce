//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Media metadata extractor CLI
#[derive(Parser, Debug)]
#[command(name = "media-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Cursor state file (JSON); enables `more --resume`
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a playlist
    Info {
        /// Playlist URL
        url: String,

        /// Follow cursors to the end of the list
        #[arg(long)]
        full: bool,
    },

    /// Fetch more items of a playlist
    More {
        /// Playlist URL
        url: String,

        /// Cursor token printed by a previous call
        #[arg(long, required_unless_present = "resume", conflicts_with = "resume")]
        cursor: Option<String>,

        /// Continue from the cursor saved in the state file
        #[arg(long)]
        resume: bool,
    },

    /// List built-in services
    Services,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}
