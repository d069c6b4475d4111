//! CLI module
//!
//! Command-line entry point for the tap.
//!
//! # Modes
//!
//! - default - sync all streams, starting from the given state
//! - `--discover` - print the stream catalog

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
