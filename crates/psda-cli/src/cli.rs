use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "psda", author, version, about = "Power systems reference data API", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./psda.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Set the logging level (overrides `[logging] level`)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Listen address (overrides `[server] addr`)
        #[arg(long)]
        addr: Option<String>,
        /// Seed every registered source before accepting requests
        #[arg(long)]
        seed: bool,
    },
    /// Load the registry and source tables into the database
    Seed {
        /// Source directory to load; repeat for several (default: all registered)
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Keep existing rows instead of wiping every table first
        #[arg(long)]
        keep_existing: bool,
        /// Leave resources that already exist untouched
        #[arg(long)]
        keep_resources: bool,
    },
    /// Validate the topology registry without touching the database
    CheckRegistry,
}
