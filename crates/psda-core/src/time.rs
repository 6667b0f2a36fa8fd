//! Time buckets, query windows and timestamp parsing.

use crate::error::{GridError, GridResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Half-open interval `[start_datetime, end_datetime)` an observation is valid for.
///
/// Ordering is by start, then end, so a `BTreeMap<TimeBucket, _>` iterates
/// chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
}

impl TimeBucket {
    /// Build a bucket, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> GridResult<Self> {
        if start >= end {
            return Err(GridError::Validation(format!(
                "time bucket start {start} must be before end {end}"
            )));
        }
        Ok(Self {
            start_datetime: start,
            end_datetime: end,
        })
    }
}

/// Optional bounds applied to bucket start times, inclusive on both ends.
///
/// A missing bound is unbounded on that side. Buckets that straddle a bound are
/// kept or dropped whole based on their start; nothing is clipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TimeWindow {
    #[serde(default, deserialize_with = "deserialize_bound")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_bound")]
    pub end_datetime: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            start_datetime: start,
            end_datetime: end,
        }
    }

    pub fn contains(&self, start: &DateTime<Utc>) -> bool {
        if let Some(lower) = &self.start_datetime {
            if start < lower {
                return false;
            }
        }
        if let Some(upper) = &self.end_datetime {
            if start > upper {
                return false;
            }
        }
        true
    }
}

/// Parse a timestamp as written in source files and query strings.
///
/// Accepts RFC 3339 (`2021-06-01T00:00:00Z`, `2021-06-01T02:00:00+02:00`),
/// naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (read as UTC) and plain
/// dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> GridResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(GridError::Parse(format!(
        "unrecognised timestamp '{value}'; use RFC3339 or YYYY-MM-DD[ HH:MM:SS]"
    )))
}

fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_with_offset_normalizes_to_utc() {
        let parsed = parse_timestamp("2021-06-01T02:00:00+02:00").unwrap();
        assert_eq!(parsed, utc(2021, 6, 1, 0));
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_timestamp("2021-06-01 01:00:00").unwrap(),
            utc(2021, 6, 1, 1)
        );
        assert_eq!(
            parse_timestamp("2021-06-01T01:00:00").unwrap(),
            utc(2021, 6, 1, 1)
        );
        assert_eq!(parse_timestamp("2021-01-15").unwrap(), utc(2021, 1, 15, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, GridError::Parse(_)));
    }

    #[test]
    fn test_bucket_rejects_inverted_interval() {
        assert!(TimeBucket::new(utc(2021, 1, 1, 1), utc(2021, 1, 1, 0)).is_err());
        assert!(TimeBucket::new(utc(2021, 1, 1, 0), utc(2021, 1, 1, 0)).is_err());
        assert!(TimeBucket::new(utc(2021, 1, 1, 0), utc(2021, 1, 1, 1)).is_ok());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = TimeWindow::new(Some(utc(2021, 2, 1, 0)), Some(utc(2021, 3, 1, 0)));
        assert!(!window.contains(&utc(2021, 1, 1, 0)));
        assert!(window.contains(&utc(2021, 2, 1, 0)));
        assert!(window.contains(&utc(2021, 3, 1, 0)));
        assert!(!window.contains(&utc(2021, 3, 1, 1)));
    }

    #[test]
    fn test_unbounded_window_accepts_everything() {
        let window = TimeWindow::unbounded();
        assert!(window.contains(&utc(1990, 1, 1, 0)));
        assert!(window.contains(&utc(2090, 1, 1, 0)));
    }

    #[test]
    fn test_window_deserializes_date_only_bound() {
        let window: TimeWindow =
            serde_json::from_str(r#"{"start_datetime": "2021-01-15"}"#).unwrap();
        assert_eq!(window.start_datetime, Some(utc(2021, 1, 15, 0)));
        assert_eq!(window.end_datetime, None);
    }
}
