//! Subcommand implementations.

use anyhow::{Context, Result};
use psda_api::{run_server, AppState};
use psda_db::{GridStore, SeedOptions, SeedReport, Seeder, WriteMode};
use psda_io::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::PsdaConfig;

async fn open_seeder(config: &PsdaConfig) -> Result<Seeder> {
    let store = GridStore::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("opening database {}", config.database.url))?;
    Ok(Seeder::new(store, &config.data.dir, &config.data.registry))
}

pub async fn serve(config: &PsdaConfig, addr: Option<String>, seed: bool) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.server.addr.clone());
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid listen address '{addr}'"))?;

    let seeder = Arc::new(open_seeder(config).await?);
    if seed {
        let report = seeder
            .run(&SeedOptions::default())
            .await
            .context("seeding before serve")?;
        info!(
            processed = ?report.sources_processed,
            observations = report.rows_written.observations(),
            "initial seed complete"
        );
    }

    run_server(addr, AppState::new(seeder))
        .await
        .with_context(|| format!("serving on {addr}"))
}

pub async fn seed(
    config: &PsdaConfig,
    sources: Vec<String>,
    keep_existing: bool,
    keep_resources: bool,
) -> Result<SeedReport> {
    let seeder = open_seeder(config).await?;
    let options = SeedOptions {
        sources: if sources.is_empty() { None } else { Some(sources) },
        delete_existing: !keep_existing,
        resource_mode: if keep_resources {
            WriteMode::KeepExisting
        } else {
            WriteMode::Overwrite
        },
    };
    let report = seeder.run(&options).await.context("seeding failed")?;
    Ok(report)
}

/// Load the registry and describe it in one line per fact.
pub fn check_registry(config: &PsdaConfig) -> Result<Vec<String>> {
    let registry = Registry::load(&config.data.registry)
        .with_context(|| format!("checking registry {}", config.data.registry.display()))?;

    let mut lines = vec![
        format!("resources: {}", registry.len()),
        format!("sources: {}", registry.sources().join(", ")),
        format!("fuel types: {}", registry.fuel_types().len()),
        format!("fuel technologies: {}", registry.fuel_technologies().len()),
        format!("topology levels: {}", registry.topology_levels().len()),
        format!("diagnostics: {}", registry.diagnostics().summary()),
    ];
    for issue in &registry.diagnostics().issues {
        lines.push(format!("  {issue}"));
    }
    Ok(lines)
}
