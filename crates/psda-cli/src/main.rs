use anyhow::Result;
use clap::Parser;
use psda_cli::cli::{Cli, Commands};
use psda_cli::commands;
use psda_cli::config::PsdaConfig;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PsdaConfig::load(cli.config.as_deref())?;

    let level = match cli.log_level {
        Some(level) => level,
        None => config.log_level()?,
    };
    // stdout carries command output; logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve { addr, seed } => commands::serve(&config, addr, seed).await,
        Commands::Seed {
            sources,
            keep_existing,
            keep_resources,
        } => {
            let report = commands::seed(&config, sources, keep_existing, keep_resources).await?;
            info!(diagnostics = %report.diagnostics.summary(), "seed report");
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::CheckRegistry => {
            for line in commands::check_registry(&config)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}
