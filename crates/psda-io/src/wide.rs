//! Wide generation/capacity tables and the melt into narrow fuel rows.
//!
//! A wide table has fixed columns (`resource_id`, optional `parent_id`,
//! `start_datetime`, `end_datetime`, `unit`, optional `technology`) and one
//! value column per fuel type:
//!
//! ```csv
//! resource_id,start_datetime,end_datetime,unit,Solar,Wind
//! US-WECC-CISO,2021-06-01T00:00:00Z,2021-06-01T01:00:00Z,MWh,100,50
//! ```
//!
//! Melting yields one [`FuelObservation`] per (row, fuel column). Empty and
//! NaN cells are skipped and counted; a cell that is present but not a finite
//! number fails the read.

use crate::table::{open_reader, parse_bucket, parse_value, HeaderIndex};
use anyhow::{anyhow, bail, Context, Result};
use psda_core::{normalize_resource_id, Diagnostics, FuelObservation, FuelType};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const FIXED_COLUMNS: [&str; 6] = [
    "resource_id",
    "parent_id",
    "start_datetime",
    "end_datetime",
    "unit",
    "technology",
];

/// Result of melting one wide table.
#[derive(Debug, Default)]
pub struct WideRead {
    pub rows: Vec<FuelObservation>,
    /// Canonical fuel names of the value columns, in column order.
    pub fuel_columns: Vec<String>,
    /// `resource_id -> parent_id` as written in the optional `parent_id` column.
    pub declared_parents: BTreeMap<String, String>,
    pub skipped_cells: usize,
    pub diagnostics: Diagnostics,
}

impl WideRead {
    /// Every resource id the table mentions, parents included.
    pub fn referenced_ids(&self) -> BTreeSet<String> {
        let mut ids: BTreeSet<String> = self.rows.iter().map(|r| r.resource_id.clone()).collect();
        for (child, parent) in &self.declared_parents {
            ids.insert(child.clone());
            ids.insert(parent.clone());
        }
        ids
    }
}

struct FuelColumn {
    position: usize,
    header: String,
    fuel: String,
}

/// Melt a wide table from disk.
pub fn read_wide(path: &Path) -> Result<WideRead> {
    let mut reader = open_reader(path)?;
    let origin = path.display().to_string();
    melt(&mut reader, &origin)
}

/// Melt a wide table from any reader; `origin` labels errors and diagnostics.
pub fn melt<R: std::io::Read>(reader: &mut csv::Reader<R>, origin: &str) -> Result<WideRead> {
    let headers = reader
        .headers()
        .with_context(|| format!("reading header of {origin}"))?
        .clone();
    let index = HeaderIndex::new(&headers);
    let resource_col = index.require("resource_id", origin)?;
    let start_col = index.require("start_datetime", origin)?;
    let end_col = index.require("end_datetime", origin)?;
    let unit_col = index.require("unit", origin)?;
    let parent_col = index.find("parent_id");
    let technology_col = index.find("technology");

    let mut fuel_columns: Vec<FuelColumn> = Vec::new();
    for (position, header) in headers.iter().enumerate() {
        let header = header.trim();
        if FIXED_COLUMNS.contains(&header.to_ascii_lowercase().as_str()) {
            continue;
        }
        let fuel = FuelType::from(header).as_str().to_string();
        if fuel.is_empty() {
            bail!("{origin}: column {} has an empty header", position + 1);
        }
        if let Some(existing) = fuel_columns.iter().find(|c| c.fuel == fuel) {
            bail!(
                "{origin}: columns '{}' and '{}' both map to fuel type '{}'",
                existing.header,
                header,
                fuel
            );
        }
        fuel_columns.push(FuelColumn {
            position,
            header: header.to_string(),
            fuel,
        });
    }
    if fuel_columns.is_empty() {
        bail!("{origin}: no fuel type value columns");
    }

    let mut read = WideRead {
        fuel_columns: fuel_columns.iter().map(|c| c.fuel.clone()).collect(),
        ..WideRead::default()
    };

    for record in reader.records() {
        let record = record.with_context(|| format!("reading record of {origin}"))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or_default();
        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let resource_id = normalize_resource_id(field(resource_col));
        if resource_id.is_empty() {
            bail!("{origin}: empty resource_id at line {line}");
        }
        let bucket = parse_bucket(field(start_col), field(end_col))
            .with_context(|| format!("{origin}: line {line}"))?;
        let unit = field(unit_col).to_string();
        let technology = technology_col
            .map(field)
            .filter(|tech| !tech.is_empty())
            .map(str::to_string);

        if let Some(parent) = parent_col.map(field).filter(|p| !p.is_empty()) {
            read.declared_parents
                .insert(resource_id.clone(), normalize_resource_id(parent));
        }

        for column in &fuel_columns {
            let cell = field(column.position);
            let Some(value) = parse_value(cell).map_err(|_| {
                anyhow!(
                    "{origin}: line {line}: value '{cell}' in column '{}' is not a number",
                    column.header
                )
            })?
            else {
                read.skipped_cells += 1;
                continue;
            };
            read.rows.push(FuelObservation {
                resource_id: resource_id.clone(),
                bucket,
                fuel_type: column.fuel.clone(),
                technology: technology.clone(),
                value,
                unit: unit.clone(),
            });
        }
    }

    if read.skipped_cells > 0 {
        read.diagnostics.warn(
            "melt",
            &format!("skipped {} empty value cells", read.skipped_cells),
            origin,
        );
    }
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn melt_str(data: &str) -> Result<WideRead> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        melt(&mut reader, "generation.csv")
    }

    #[test]
    fn test_melt_produces_one_row_per_fuel_column() {
        let read = melt_str(
            "resource_id,start_datetime,end_datetime,unit,Solar,Wind\n\
             us-wecc-ciso,2021-06-01T00:00:00Z,2021-06-01T01:00:00Z,MWh,100,50\n",
        )
        .unwrap();
        assert_eq!(read.fuel_columns, vec!["solar", "wind"]);
        assert_eq!(read.rows.len(), 2);
        let solar = &read.rows[0];
        assert_eq!(solar.resource_id, "US-WECC-CISO");
        assert_eq!(solar.fuel_type, "solar");
        assert_eq!(solar.value, 100.0);
        assert_eq!(solar.unit, "MWh");
        assert_eq!(
            solar.bucket.start_datetime,
            Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap()
        );
        let total: f64 = read.rows.iter().map(|r| r.value).sum();
        assert_eq!(total, 150.0);
    }

    #[test]
    fn test_empty_cells_are_skipped_and_counted() {
        let read = melt_str(
            "resource_id,start_datetime,end_datetime,unit,solar,wind,nuclear\n\
             GB,2021-06-01 00:00:00,2021-06-01 01:00:00,MW,10,,\n\
             GB,2021-06-01 01:00:00,2021-06-01 02:00:00,MW,NaN,5,7\n",
        )
        .unwrap();
        assert_eq!(read.rows.len(), 3);
        assert_eq!(read.skipped_cells, 3);
        assert_eq!(read.diagnostics.len(), 1);
    }

    #[test]
    fn test_unparsable_value_is_an_error() {
        let err = melt_str(
            "resource_id,start_datetime,end_datetime,unit,solar\n\
             GB,2021-06-01,2021-06-02,MW,lots\n",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("lots"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_infinite_value_is_an_error() {
        let err = melt_str(
            "resource_id,start_datetime,end_datetime,unit,solar,wind\n\
             GB,2021-06-01,2021-06-02,MW,1,2\n\
             GB,2021-06-02,2021-06-03,MW,3,-inf\n",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("'wind'"));
    }

    #[test]
    fn test_optional_columns_are_not_fuels() {
        let read = melt_str(
            "resource_id,parent_id,start_datetime,end_datetime,unit,technology,Hydro (MW)\n\
             US-WECC-CISO-PV1,us-wecc-ciso,2021-06-01,2021-06-02,MW,run_of_river,3\n",
        )
        .unwrap();
        assert_eq!(read.fuel_columns, vec!["water"]);
        assert_eq!(read.rows[0].technology.as_deref(), Some("run_of_river"));
        assert_eq!(
            read.declared_parents.get("US-WECC-CISO-PV1").map(String::as_str),
            Some("US-WECC-CISO")
        );
        let ids: Vec<_> = read.referenced_ids().into_iter().collect();
        assert_eq!(ids, vec!["US-WECC-CISO", "US-WECC-CISO-PV1"]);
    }

    #[test]
    fn test_missing_fixed_column_is_an_error() {
        let err = melt_str("resource_id,start_datetime,unit,solar\nGB,2021-06-01,MW,1\n")
            .unwrap_err();
        assert!(err.to_string().contains("end_datetime"));
    }

    #[test]
    fn test_colliding_fuel_columns_are_rejected() {
        let err = melt_str(
            "resource_id,start_datetime,end_datetime,unit,Coal,hard coal\n\
             GB,2021-06-01,2021-06-02,MW,1,2\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("hard_coal"));
    }

    #[test]
    fn test_inverted_bucket_is_an_error() {
        let err = melt_str(
            "resource_id,start_datetime,end_datetime,unit,solar\n\
             GB,2021-06-02,2021-06-01,MW,1\n",
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("must be before"));
    }
}
