//! Command Line Interface module
//!
//! Implements argument parsing for targetwatch. The asset/timeframe
//! selection is deliberately not a flag: it is chosen interactively.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "targetwatch")]
#[command(about = "Targetwatch Live/Target Price Monitor")]
#[command(
    long_about = "Streams live chainlink prices from Polymarket and polls the Vatic target-price API for an interactively selected asset and timeframe"
)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, default_value = "config.toml")]
    pub config_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Adjust log level based on verbose flag
    pub fn effective_log_level(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }
}
