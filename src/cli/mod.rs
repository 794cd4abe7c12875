//! CLI module
//!
//! Command-line interface for replaying recorded listings.
//!
//! # Commands
//!
//! - `list` - Print every item of a recorded listing
//! - `pages` - Print one summary per page
//! - `validate` - Check a page descriptor

mod commands;
mod replay;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use replay::{load_fixture, load_fixture_from_str, Fixture, ReplayError};
pub use runner::Runner;
