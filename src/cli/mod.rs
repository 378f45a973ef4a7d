//! Command-line interface definitions.

pub mod generate;
pub mod ingest;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Betlytics - betting analytics over a cache-aside storage layer.
#[derive(Parser, Debug)]
#[command(name = "betlytics")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the analytics API server
    Serve(ServeArgs),

    /// Load bet records from a file and persist them in batches
    Ingest(IngestArgs),

    /// Generate synthetic bet data for testing
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Override the configured listen port
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Newline-delimited JSON file of bet records
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Output file
    pub file: PathBuf,

    /// Number of records to generate
    #[arg(long, default_value_t = 10_000)]
    pub records: usize,
}
