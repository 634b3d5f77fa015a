//! Command-line argument definitions for the Tapeloom CLI.
//!
//! [`Args`] selects the scenario to replay, where the rendered diagram goes,
//! which configuration file to load and how verbose logging is.

use clap::Parser;

/// Command-line arguments for the Tapeloom scenario runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the scenario file (TOML)
    #[arg(help = "Path to the scenario file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
