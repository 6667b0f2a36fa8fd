//! Shared CSV plumbing for the source table readers.

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use psda_core::{parse_timestamp, TimeBucket};
use std::fs::File;
use std::path::Path;

pub(crate) fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))
}

/// Case-insensitive header lookup.
pub(crate) struct HeaderIndex {
    names: Vec<String>,
}

impl HeaderIndex {
    pub(crate) fn new(headers: &StringRecord) -> Self {
        Self {
            names: headers
                .iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    pub(crate) fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    pub(crate) fn require(&self, name: &str, origin: &str) -> Result<usize> {
        self.find(name)
            .ok_or_else(|| anyhow!("{origin}: missing required column '{name}'"))
    }
}

pub(crate) fn parse_bucket(start: &str, end: &str) -> Result<TimeBucket> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    Ok(TimeBucket::new(start, end)?)
}

/// Parse a numeric cell. Empty and NaN cells are `None`; infinities and
/// anything unparsable are errors.
pub(crate) fn parse_value(cell: &str) -> std::result::Result<Option<f64>, ()> {
    if cell.is_empty() {
        return Ok(None);
    }
    let value: f64 = cell.parse().map_err(|_| ())?;
    if value.is_nan() {
        Ok(None)
    } else if value.is_infinite() {
        Err(())
    } else {
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(""), Ok(None));
        assert_eq!(parse_value("NaN"), Ok(None));
        assert_eq!(parse_value("-12.5"), Ok(Some(-12.5)));
        assert_eq!(parse_value("1e3"), Ok(Some(1000.0)));
        assert_eq!(parse_value("inf"), Err(()));
        assert_eq!(parse_value("-inf"), Err(()));
        assert_eq!(parse_value("infinity"), Err(()));
        assert_eq!(parse_value("n/a"), Err(()));
    }
}
