//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Revinate Porter tap
///
/// Emits schema, record and state messages as JSON lines on stdout.
/// Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "revinate-tap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, required_unless_present = "config_json")]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, conflicts_with = "config")]
    pub config_json: Option<String>,

    /// State file (JSON)
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, conflicts_with = "state")]
    pub state_json: Option<String>,

    /// Print the stream catalog and exit
    #[arg(short, long)]
    pub discover: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
