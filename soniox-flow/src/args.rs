use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Soniox transcription runner
#[derive(Debug, Parser)]
#[command(name = "soniox-flow", about = "Run Soniox transcription operations over a batch of items")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "soniox.toml", env = "SONIOX_FLOW_CONFIG")]
    pub config: PathBuf,

    /// Override the log filter (`EnvFilter` syntax)
    #[arg(long, env = "SONIOX_FLOW_LOG")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the node over a JSON array of items
    Run(RunArgs),
    /// Check that the configured API key is accepted
    TestCredentials,
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// JSON file holding the input items
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON file with node-level parameters, overlaid by each item's `parameters`
    #[arg(short, long)]
    pub parameters: Option<PathBuf>,

    /// Write output items here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit failed items with an `error` field instead of stopping
    #[arg(long)]
    pub continue_on_fail: bool,
}
