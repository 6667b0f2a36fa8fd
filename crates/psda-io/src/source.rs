//! All tables of one data source directory (`<data dir>/<SOURCE>/`).

use crate::narrow::{read_exchanges, read_interconnections, read_observations, NarrowRead};
use crate::wide::{read_wide, WideRead};
use anyhow::{Context, Result};
use psda_core::{Diagnostics, Exchange, Interconnection, Observation, ObservationKind};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Parsed tables of a source; absent files stay `None`.
#[derive(Debug, Default)]
pub struct SourceTables {
    pub source: String,
    pub generation: Option<WideRead>,
    pub capacity: Option<WideRead>,
    pub demand: Option<NarrowRead<Observation>>,
    pub day_ahead_price: Option<NarrowRead<Observation>>,
    pub exchanges: Option<NarrowRead<Exchange>>,
    pub transmission_capacity: Option<NarrowRead<Interconnection>>,
    /// Kinds whose file was not present.
    pub missing: Vec<ObservationKind>,
    pub diagnostics: Diagnostics,
}

impl SourceTables {
    /// Every resource id mentioned by any table of the source.
    pub fn referenced_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        for wide in [&self.generation, &self.capacity].into_iter().flatten() {
            ids.extend(wide.referenced_ids());
        }
        for narrow in [&self.demand, &self.day_ahead_price].into_iter().flatten() {
            ids.extend(narrow.referenced_ids());
        }
        if let Some(exchanges) = &self.exchanges {
            ids.extend(exchanges.referenced_ids());
        }
        if let Some(links) = &self.transmission_capacity {
            ids.extend(links.referenced_ids());
        }
        ids
    }

    /// Fuel names discovered in wide table headers.
    pub fn fuel_columns(&self) -> BTreeSet<String> {
        [&self.generation, &self.capacity]
            .into_iter()
            .flatten()
            .flat_map(|wide| wide.fuel_columns.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.len() == ObservationKind::ALL.len()
    }
}

pub fn source_dir(data_dir: &Path, source: &str) -> PathBuf {
    data_dir.join(source)
}

/// Read every known table of `source`. The directory must exist; missing
/// files inside it are recorded, not errors.
pub fn read_source(data_dir: &Path, source: &str) -> Result<SourceTables> {
    let dir = source_dir(data_dir, source);
    let mut tables = SourceTables {
        source: source.to_string(),
        ..SourceTables::default()
    };

    for kind in ObservationKind::ALL {
        let path = dir.join(kind.file_name());
        if !path.is_file() {
            tables.missing.push(kind);
            tables.diagnostics.warn(
                "source",
                &format!("{} not found", kind.file_name()),
                source,
            );
            continue;
        }
        let context = || format!("reading {} for source {}", kind.file_name(), source);
        match kind {
            ObservationKind::Generation => {
                let read = read_wide(&path).with_context(context)?;
                tables.diagnostics.merge(read.diagnostics.clone());
                tables.generation = Some(read);
            }
            ObservationKind::Capacity => {
                let read = read_wide(&path).with_context(context)?;
                tables.diagnostics.merge(read.diagnostics.clone());
                tables.capacity = Some(read);
            }
            ObservationKind::Demand => {
                let read = read_observations(&path).with_context(context)?;
                tables.diagnostics.merge(read.diagnostics.clone());
                tables.demand = Some(read);
            }
            ObservationKind::DayAheadPrice => {
                let read = read_observations(&path).with_context(context)?;
                tables.diagnostics.merge(read.diagnostics.clone());
                tables.day_ahead_price = Some(read);
            }
            ObservationKind::Exchange => {
                let read = read_exchanges(&path).with_context(context)?;
                tables.diagnostics.merge(read.diagnostics.clone());
                tables.exchanges = Some(read);
            }
            ObservationKind::TransmissionCapacity => {
                let read = read_interconnections(&path).with_context(context)?;
                tables.diagnostics.merge(read.diagnostics.clone());
                tables.transmission_capacity = Some(read);
            }
        }
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_files_are_recorded() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("EIA")).unwrap();
        fs::write(
            dir.path().join("EIA").join("generation.csv"),
            "resource_id,start_datetime,end_datetime,unit,solar,wind\n\
             US-WECC-CISO,2021-06-01T00:00:00Z,2021-06-01T01:00:00Z,MWh,100,50\n",
        )
        .unwrap();

        let tables = read_source(dir.path(), "EIA").unwrap();
        assert_eq!(tables.generation.as_ref().unwrap().rows.len(), 2);
        assert_eq!(tables.missing.len(), 5);
        assert!(!tables.missing.contains(&ObservationKind::Generation));
        assert_eq!(tables.diagnostics.len(), 5);
        assert!(!tables.is_empty());
        let fuels: Vec<_> = tables.fuel_columns().into_iter().collect();
        assert_eq!(fuels, vec!["solar", "wind"]);
    }

    #[test]
    fn test_empty_source_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("ELEXON")).unwrap();
        let tables = read_source(dir.path(), "ELEXON").unwrap();
        assert!(tables.is_empty());
        assert!(tables.referenced_ids().is_empty());
    }
}
