//! Seeding: load the registry and source tables into the store.
//!
//! A run has two phases. The read phase loads the registry from disk and
//! parses every requested source, checking that each referenced resource id is
//! declared. Nothing is written if any of that fails. The write phase then
//! applies everything inside a single transaction: optional wipe, reference
//! metadata, resources (parents first), observations.
//!
//! Runs are exclusive. A second caller gets [`StoreError::SeedInProgress`]
//! instead of queueing behind the first.

use crate::error::{StoreError, StoreResult};
use crate::schema::{self, FuelTable, SeriesTable};
use crate::store::{self as writes, GridStore, TableCounts, WriteMode};
use psda_core::{
    Diagnostics, FuelType, FuelTypeInfo, GridError, Resource, FUEL_TYPE_EXTERNAL_REFERENCE,
};
use psda_io::{read_source, source_dir, Registry, SourceTables};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// What to seed and how.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Source directories to load; `None` means every source named in the registry.
    pub sources: Option<Vec<String>>,
    /// Wipe every table before loading.
    pub delete_existing: bool,
    pub resource_mode: WriteMode,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            sources: None,
            delete_existing: true,
            resource_mode: WriteMode::Overwrite,
        }
    }
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub sources_processed: Vec<String>,
    pub sources_skipped: Vec<String>,
    /// Rows written per table during this run.
    pub rows_written: TableCounts,
    pub diagnostics: Diagnostics,
}

/// Runs seeding against a store; one run at a time.
#[derive(Debug)]
pub struct Seeder {
    store: GridStore,
    data_dir: PathBuf,
    registry_path: PathBuf,
    lock: Mutex<()>,
    registry: RwLock<Option<Arc<Registry>>>,
}

impl Seeder {
    pub fn new(store: GridStore, data_dir: impl Into<PathBuf>, registry_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            data_dir: data_dir.into(),
            registry_path: registry_path.into(),
            lock: Mutex::new(()),
            registry: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    /// Registry loaded by the most recent successful run.
    pub async fn current_registry(&self) -> Option<Arc<Registry>> {
        self.registry.read().await.clone()
    }

    pub fn is_running(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    pub async fn run(&self, options: &SeedOptions) -> StoreResult<SeedReport> {
        let _guard = self.lock.try_lock().map_err(|_| StoreError::SeedInProgress)?;

        let registry = Arc::new(Registry::load(&self.registry_path)?);
        info!(
            resources = registry.len(),
            path = %self.registry_path.display(),
            "loaded topology registry"
        );

        let mut report = SeedReport {
            diagnostics: registry.diagnostics().clone(),
            ..SeedReport::default()
        };

        let sources = match &options.sources {
            Some(sources) => sources.clone(),
            None => registry.sources(),
        };

        let mut loaded: Vec<SourceTables> = Vec::new();
        for source in &sources {
            if !source_dir(&self.data_dir, source).is_dir() {
                warn!(source = %source, "source directory not found, skipping");
                report.diagnostics.warn(
                    "source",
                    "source directory not found",
                    source,
                );
                report.sources_skipped.push(source.clone());
                continue;
            }
            let tables = read_source(&self.data_dir, source)?;
            for kind in &tables.missing {
                warn!(source = %source, file = kind.file_name(), "source file not found, skipping");
            }
            if tables.is_empty() {
                report.sources_skipped.push(source.clone());
            } else {
                check_declared(&registry, &tables, &mut report.diagnostics)?;
                report.sources_processed.push(source.clone());
            }
            report.diagnostics.merge(tables.diagnostics.clone());
            loaded.push(tables);
        }

        let resources = resources_to_write(&registry, &loaded);
        let fuel_types = fuel_types_to_write(&registry, &loaded);

        let mut tx = self.store.pool().begin().await?;
        if options.delete_existing {
            info!("deleting existing data");
            schema::wipe(&mut tx).await?;
        }

        let counts = &mut report.rows_written;
        counts.topology_levels =
            writes::upsert_topology_levels(&mut tx, registry.topology_levels()).await?;
        counts.fuel_types = writes::upsert_fuel_types(&mut tx, &fuel_types).await?;
        counts.fuel_technologies =
            writes::upsert_fuel_technologies(&mut tx, registry.fuel_technologies()).await?;
        counts.resources =
            writes::upsert_resources(&mut tx, &resources, options.resource_mode).await?;

        for tables in &loaded {
            let mut written = TableCounts::default();
            if let Some(read) = &tables.generation {
                written.generation =
                    writes::upsert_fuel_rows(&mut tx, FuelTable::Generation, &read.rows).await?;
            }
            if let Some(read) = &tables.capacity {
                written.capacity =
                    writes::upsert_fuel_rows(&mut tx, FuelTable::Capacity, &read.rows).await?;
            }
            if let Some(read) = &tables.demand {
                written.demand =
                    writes::upsert_series_rows(&mut tx, SeriesTable::Demand, &read.rows).await?;
            }
            if let Some(read) = &tables.day_ahead_price {
                written.day_ahead_price =
                    writes::upsert_series_rows(&mut tx, SeriesTable::DayAheadPrice, &read.rows)
                        .await?;
            }
            if let Some(read) = &tables.exchanges {
                written.exchanges = writes::upsert_exchanges(&mut tx, &read.rows).await?;
            }
            if let Some(read) = &tables.transmission_capacity {
                written.transmission_capacity =
                    writes::upsert_interconnections(&mut tx, &read.rows).await?;
            }
            debug!(source = %tables.source, ?written, "source rows written");
            counts.add(&written);
        }
        tx.commit().await?;

        *self.registry.write().await = Some(registry);
        info!(
            processed = report.sources_processed.len(),
            skipped = report.sources_skipped.len(),
            observations = report.rows_written.observations(),
            diagnostics = %report.diagnostics.summary(),
            "seeding finished"
        );
        Ok(report)
    }
}

fn check_declared(
    registry: &Registry,
    tables: &SourceTables,
    diagnostics: &mut Diagnostics,
) -> StoreResult<()> {
    for id in tables.referenced_ids() {
        if !registry.contains(&id) {
            return Err(GridError::UnknownResource {
                id,
                origin: format!("source {}", tables.source),
            }
            .into());
        }
    }
    for read in [&tables.generation, &tables.capacity].into_iter().flatten() {
        for (child, parent) in &read.declared_parents {
            let declared = registry.hierarchy().parent_of(child);
            if declared != Some(parent.as_str()) {
                diagnostics.warn(
                    "registry",
                    &format!(
                        "table names parent {parent} but the registry has {}",
                        declared.unwrap_or("none")
                    ),
                    child,
                );
            }
        }
    }
    Ok(())
}

/// Every referenced resource plus its registry ancestors, parents first.
fn resources_to_write(registry: &Registry, loaded: &[SourceTables]) -> Vec<Resource> {
    let referenced: BTreeSet<String> = loaded
        .iter()
        .flat_map(SourceTables::referenced_ids)
        .collect();
    registry
        .hierarchy()
        .with_ancestors(&referenced)
        .iter()
        .filter_map(|id| registry.get(id).map(|entry| entry.to_resource()))
        .collect()
}

/// Registry fuel types, every known fuel, and fuel columns found in tables.
fn fuel_types_to_write(registry: &Registry, loaded: &[SourceTables]) -> Vec<FuelTypeInfo> {
    let mut out: Vec<FuelTypeInfo> = registry.fuel_types().to_vec();
    let mut seen: BTreeSet<String> = out.iter().map(|fuel| fuel.name.clone()).collect();
    let known = FuelType::KNOWN.iter().map(|fuel| fuel.as_str().to_string());
    let discovered = loaded.iter().flat_map(SourceTables::fuel_columns);
    for name in known.chain(discovered) {
        if seen.insert(name.clone()) {
            out.push(FuelTypeInfo::named(&FuelType::from(name)));
        }
    }
    for fuel in &mut out {
        if fuel.external_id.is_some() && fuel.external_reference.is_none() {
            fuel.external_reference = Some(FUEL_TYPE_EXTERNAL_REFERENCE.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_second_run_is_rejected_while_locked() {
        let store = GridStore::in_memory().await.unwrap();
        let seeder = Seeder::new(store, "data", "data/registry.yaml");
        let _held = seeder.lock.lock().await;
        assert!(seeder.is_running());
        let err = seeder.run(&SeedOptions::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::SeedInProgress));
    }

    #[tokio::test]
    async fn test_fuel_types_include_known_and_discovered() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("registry.yaml"),
            "resources:\n  - { id: GB, name: Great Britain, type: SYSTEM, source: X }\n\
             fuel_types:\n  - { name: solar, external_id: T010000 }\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("X")).unwrap();
        fs::write(
            dir.path().join("X").join("generation.csv"),
            "resource_id,start_datetime,end_datetime,unit,Solar,Pumped Storage\n\
             GB,2021-06-01,2021-06-02,MWh,1,2\n",
        )
        .unwrap();
        let registry = Registry::load(&dir.path().join("registry.yaml")).unwrap();
        let tables = read_source(dir.path(), "X").unwrap();
        let fuels = fuel_types_to_write(&registry, &[tables]);

        assert_eq!(fuels.len(), FuelType::KNOWN.len() + 1);
        assert_eq!(fuels[0].name, "solar");
        assert_eq!(
            fuels[0].external_reference.as_deref(),
            Some(FUEL_TYPE_EXTERNAL_REFERENCE)
        );
        assert!(fuels.iter().any(|fuel| fuel.name == "pumped_storage"));
    }
}
