//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Forward Binance P2P, Pay and deposit history to a bookkeeping API
#[derive(Parser, Debug)]
#[command(name = "ledgerbridge")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll continuously until interrupted
    Run(ConfigPathArg),

    /// Run a single cycle and print its outcome
    Once(ConfigPathArg),

    /// Validate configuration and show resolved settings
    Check(ConfigPathArg),
}

/// Config file location shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConfigPathArg {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}
