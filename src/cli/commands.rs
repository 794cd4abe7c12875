//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Replay recorded paged list conversations through pagekit
#[derive(Parser, Debug)]
#[command(name = "pagekit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Page descriptor file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub descriptor: Option<PathBuf>,

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
    /// Print every item of a recorded listing
    List {
        /// Recorded request and pages (YAML or JSON)
        #[arg(long)]
        fixture: PathBuf,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,
    },

    /// Print one summary per page of a recorded listing
    Pages {
        /// Recorded request and pages (YAML or JSON)
        #[arg(long)]
        fixture: PathBuf,
    },

    /// Validate the page descriptor
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Human-readable output
    Pretty,
}
