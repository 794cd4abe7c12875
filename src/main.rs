//! pagekit CLI
//!
//! Command-line interface for replaying recorded listings

use clap::Parser;
use pagekit::cli::{Cli, Runner};

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the listing itself
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
