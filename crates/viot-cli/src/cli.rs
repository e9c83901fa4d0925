//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Rounded tables and colors (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// Reusable simulation arguments
#[derive(Debug, Clone, Args)]
pub struct SimArgs {
    /// RNG seed for a reproducible run (overrides config)
    #[arg(short, long, env = "VIOT_SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser)]
#[command(name = "viot")]
#[command(author, version, about = "Simulated IoT device fleet", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "VIOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (rich, plain)
    #[arg(long, global = true, value_enum, default_value = "rich")]
    pub style: StyleMode,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a live session and print events as they happen
    Run {
        #[command(flatten)]
        sim: SimArgs,

        /// Stop after this many device ticks (runs until Ctrl-C when omitted)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Hide toast events
        #[arg(long)]
        no_toasts: bool,
    },

    /// Seed a fleet and print it
    Snapshot {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of devices to seed (overrides config)
        #[arg(short, long)]
        devices: Option<usize>,

        /// Also print the notification feed
        #[arg(short, long)]
        notifications: bool,
    },

    /// Advance a fleet offline and print its statistics
    Summary {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of device ticks to apply first
        #[arg(short, long, default_value = "0")]
        ticks: u64,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
