//! Command-line argument definitions for the Canopy CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the scenario to replay, where the
//! resulting outline goes, the configuration file and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Canopy scenario runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the scenario file (TOML)
    #[arg(help = "Path to the scenario file")]
    pub input: String,

    /// Path to the output file; the outline is printed to stdout if omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
