use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "call-ledger", version, about = "Call-log persistence and reporting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the most recent call logs
    Recent {
        /// Maximum number of logs to display
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show calls with a confirmed booking
    Bookings,

    /// Show aggregate call statistics
    Stats,

    /// Persist a call record from a JSON file
    Save {
        /// Path to a JSON file containing one call record
        file: PathBuf,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (API key masked)
    Show,
    /// Validate configuration and report store reachability settings
    Validate,
}
