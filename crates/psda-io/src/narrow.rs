//! Narrow tables: demand, day-ahead prices, exchanges and transmission capacity.
//!
//! Demand and price tables carry `resource_id, start_datetime, end_datetime,
//! value, unit`. Exchange tables replace `resource_id` with
//! `resource_from_id, resource_to_id`; the value is signed. Transmission
//! capacity tables have no bucket: `resource_id, connected_resource_id, value,
//! unit`.

use crate::table::{open_reader, parse_bucket, parse_value, HeaderIndex};
use anyhow::{anyhow, bail, Context, Result};
use psda_core::{normalize_resource_id, Diagnostics, Exchange, Interconnection, Observation};
use std::collections::BTreeSet;
use std::path::Path;

/// Rows of one narrow table.
#[derive(Debug)]
pub struct NarrowRead<T> {
    pub rows: Vec<T>,
    pub skipped_rows: usize,
    /// Exchange rows whose two endpoints are the same resource
    pub self_exchanges: usize,
    pub diagnostics: Diagnostics,
}

impl<T> Default for NarrowRead<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped_rows: 0,
            self_exchanges: 0,
            diagnostics: Diagnostics::new(),
        }
    }
}

impl NarrowRead<Observation> {
    pub fn referenced_ids(&self) -> BTreeSet<String> {
        self.rows.iter().map(|r| r.resource_id.clone()).collect()
    }
}

impl NarrowRead<Exchange> {
    /// Both endpoints of every edge.
    pub fn referenced_ids(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .flat_map(|r| [r.resource_from_id.clone(), r.resource_to_id.clone()])
            .collect()
    }
}

impl NarrowRead<Interconnection> {
    pub fn referenced_ids(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .flat_map(|r| [r.resource_id.clone(), r.connected_resource_id.clone()])
            .collect()
    }
}

pub fn read_observations(path: &Path) -> Result<NarrowRead<Observation>> {
    let mut reader = open_reader(path)?;
    parse_observations(&mut reader, &path.display().to_string())
}

pub fn read_exchanges(path: &Path) -> Result<NarrowRead<Exchange>> {
    let mut reader = open_reader(path)?;
    parse_exchanges(&mut reader, &path.display().to_string())
}

pub fn read_interconnections(path: &Path) -> Result<NarrowRead<Interconnection>> {
    let mut reader = open_reader(path)?;
    parse_interconnections(&mut reader, &path.display().to_string())
}

pub fn parse_observations<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
) -> Result<NarrowRead<Observation>> {
    let headers = reader
        .headers()
        .with_context(|| format!("reading header of {origin}"))?
        .clone();
    let index = HeaderIndex::new(&headers);
    let resource_col = index.require("resource_id", origin)?;
    let columns = ValueColumns::locate(&index, origin)?;

    let mut read = NarrowRead::default();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading record of {origin}"))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or_default();
        let resource_id = required_id(&record, resource_col, "resource_id", origin, line)?;
        let Some((bucket, value, unit)) = columns.parse(&record, origin, line)? else {
            read.skipped_rows += 1;
            continue;
        };
        read.rows.push(Observation {
            resource_id,
            bucket,
            value,
            unit,
        });
    }
    read.note_skipped(origin);
    Ok(read)
}

pub fn parse_exchanges<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
) -> Result<NarrowRead<Exchange>> {
    let headers = reader
        .headers()
        .with_context(|| format!("reading header of {origin}"))?
        .clone();
    let index = HeaderIndex::new(&headers);
    let from_col = index.require("resource_from_id", origin)?;
    let to_col = index.require("resource_to_id", origin)?;
    let columns = ValueColumns::locate(&index, origin)?;

    let mut read = NarrowRead::default();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading record of {origin}"))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or_default();
        let from = required_id(&record, from_col, "resource_from_id", origin, line)?;
        let to = required_id(&record, to_col, "resource_to_id", origin, line)?;
        if from == to {
            read.self_exchanges += 1;
            read.diagnostics.warn(
                "read",
                &format!("line {line}: exchange from a resource to itself skipped"),
                &from,
            );
            continue;
        }
        let Some((bucket, value, unit)) = columns.parse(&record, origin, line)? else {
            read.skipped_rows += 1;
            continue;
        };
        read.rows.push(Exchange {
            resource_from_id: from,
            resource_to_id: to,
            bucket,
            value,
            unit,
        });
    }
    read.note_skipped(origin);
    Ok(read)
}

pub fn parse_interconnections<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
) -> Result<NarrowRead<Interconnection>> {
    let headers = reader
        .headers()
        .with_context(|| format!("reading header of {origin}"))?
        .clone();
    let index = HeaderIndex::new(&headers);
    let resource_col = index.require("resource_id", origin)?;
    let connected_col = index.require("connected_resource_id", origin)?;
    let value_col = index.require("value", origin)?;
    let unit_col = index.require("unit", origin)?;

    let mut read = NarrowRead::default();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading record of {origin}"))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or_default();
        let resource_id = required_id(&record, resource_col, "resource_id", origin, line)?;
        let connected = required_id(&record, connected_col, "connected_resource_id", origin, line)?;
        if resource_id == connected {
            read.diagnostics.warn(
                "read",
                &format!("line {line}: interconnection of a resource with itself skipped"),
                &resource_id,
            );
            continue;
        }
        let cell = record.get(value_col).unwrap_or("").trim();
        let Some(value) = parse_value(cell)
            .map_err(|_| anyhow!("{origin}: line {line}: value '{cell}' is not a number"))?
        else {
            read.skipped_rows += 1;
            continue;
        };
        read.rows.push(Interconnection {
            resource_id,
            connected_resource_id: connected,
            value,
            unit: record.get(unit_col).unwrap_or("").trim().to_string(),
        });
    }
    read.note_skipped(origin);
    Ok(read)
}

impl<T> NarrowRead<T> {
    fn note_skipped(&mut self, origin: &str) {
        if self.skipped_rows > 0 {
            self.diagnostics.warn(
                "read",
                &format!("skipped {} rows with an empty value", self.skipped_rows),
                origin,
            );
        }
    }
}

struct ValueColumns {
    start: usize,
    end: usize,
    value: usize,
    unit: usize,
}

impl ValueColumns {
    fn locate(index: &HeaderIndex, origin: &str) -> Result<Self> {
        Ok(Self {
            start: index.require("start_datetime", origin)?,
            end: index.require("end_datetime", origin)?,
            value: index.require("value", origin)?,
            unit: index.require("unit", origin)?,
        })
    }

    /// `None` when the value cell is empty or NaN.
    fn parse(
        &self,
        record: &csv::StringRecord,
        origin: &str,
        line: usize,
    ) -> Result<Option<(psda_core::TimeBucket, f64, String)>> {
        let field = |col: usize| record.get(col).unwrap_or("").trim();
        let bucket = parse_bucket(field(self.start), field(self.end))
            .with_context(|| format!("{origin}: line {line}"))?;
        let cell = field(self.value);
        let value = parse_value(cell)
            .map_err(|_| anyhow!("{origin}: line {line}: value '{cell}' is not a number"))?;
        Ok(value.map(|value| (bucket, value, field(self.unit).to_string())))
    }
}

fn required_id(
    record: &csv::StringRecord,
    col: usize,
    name: &str,
    origin: &str,
    line: usize,
) -> Result<String> {
    let id = normalize_resource_id(record.get(col).unwrap_or(""));
    if id.is_empty() {
        bail!("{origin}: line {line}: empty {name}");
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn test_demand_rows() {
        let read = parse_observations(
            &mut reader(
                "resource_id,start_datetime,end_datetime,value,unit\n\
                 gb,2021-06-01 00:00:00,2021-06-01 00:30:00,25000.5,MW\n\
                 GB,2021-06-01 00:30:00,2021-06-01 01:00:00,,MW\n",
            ),
            "demand.csv",
        )
        .unwrap();
        assert_eq!(read.rows.len(), 1);
        assert_eq!(read.rows[0].resource_id, "GB");
        assert_eq!(read.rows[0].value, 25000.5);
        assert_eq!(read.skipped_rows, 1);
        assert_eq!(read.diagnostics.len(), 1);
        assert_eq!(read.referenced_ids().len(), 1);
    }

    #[test]
    fn test_exchange_rows_keep_sign_and_both_endpoints() {
        let read = parse_exchanges(
            &mut reader(
                "resource_from_id,resource_to_id,start_datetime,end_datetime,value,unit\n\
                 US-WECC-CISO,US-WECC-BPAT,2021-06-01T00:00:00Z,2021-06-01T01:00:00Z,-75,MWh\n",
            ),
            "imports_exports.csv",
        )
        .unwrap();
        assert_eq!(read.rows[0].value, -75.0);
        let ids: Vec<_> = read.referenced_ids().into_iter().collect();
        assert_eq!(ids, vec!["US-WECC-BPAT", "US-WECC-CISO"]);
    }

    #[test]
    fn test_self_exchange_is_skipped_with_a_warning() {
        let read = parse_exchanges(
            &mut reader(
                "resource_from_id,resource_to_id,start_datetime,end_datetime,value,unit\n\
                 GB,gb,2021-06-01,2021-06-02,1,MWh\n\
                 GB,FR,2021-06-01,2021-06-02,2,MWh\n",
            ),
            "imports_exports.csv",
        )
        .unwrap();
        assert_eq!(read.rows.len(), 1);
        assert_eq!(read.rows[0].resource_to_id, "FR");
        assert_eq!(read.self_exchanges, 1);
        assert_eq!(read.diagnostics.len(), 1);
        assert!(read.diagnostics.issues[0].message.contains("itself"));
        assert_eq!(read.diagnostics.issues[0].subject, "GB");
    }

    #[test]
    fn test_interconnection_rows() {
        let read = parse_interconnections(
            &mut reader(
                "resource_id,connected_resource_id,value,unit\n\
                 us-wecc-ciso,us-wecc-bpat,4800,MW\n\
                 US-WECC-CISO,US-WECC-LDWP,,MW\n\
                 US-WECC-CISO,US-WECC-CISO,1,MW\n",
            ),
            "transmission_capacity.csv",
        )
        .unwrap();
        assert_eq!(read.rows.len(), 1);
        assert_eq!(read.rows[0].connected_resource_id, "US-WECC-BPAT");
        assert_eq!(read.rows[0].value, 4800.0);
        assert_eq!(read.skipped_rows, 1);
        assert_eq!(read.diagnostics.len(), 2);
        let ids: Vec<_> = read.referenced_ids().into_iter().collect();
        assert_eq!(ids, vec!["US-WECC-BPAT", "US-WECC-CISO"]);
    }

    #[test]
    fn test_infinite_value_is_rejected() {
        let err = parse_observations(
            &mut reader(
                "resource_id,start_datetime,end_datetime,value,unit\n\
                 GB,2021-06-01,2021-06-02,inf,MW\n",
            ),
            "demand.csv",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("not a number"));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = parse_observations(
            &mut reader(
                "resource_id,start_datetime,end_datetime,value,unit\n\
                 GB,2021-06-01,2021-06-02,1,MW\n\
                 GB,2021-06-02,2021-06-03,n/a,MW\n",
            ),
            "demand.csv",
        )
        .unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let read = parse_observations(
            &mut reader(
                "Resource_ID,Start_Datetime,End_Datetime,Value,Unit\n\
                 GB,2021-06-01,2021-06-02,42,EUR/MWh\n",
            ),
            "day_ahead_price.csv",
        )
        .unwrap();
        assert_eq!(read.rows[0].unit, "EUR/MWh");
    }
}
