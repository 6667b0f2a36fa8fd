//! Reshaping stored observation rows into response series.
//!
//! Stored rows are narrow (one fuel type per row). Responses are grouped per
//! time bucket with a total and a per-fuel breakdown. All functions here are
//! pure; the store fetches the rows and hands them over.

use crate::error::{GridError, GridResult};
use crate::observation::{FuelObservation, Timestamped};
use crate::time::{TimeBucket, TimeWindow};
use serde::Serialize;
use std::collections::BTreeMap;

/// Keep rows whose bucket start lies inside `window`, ordered by bucket.
pub fn filter_by_window<T: Timestamped>(rows: Vec<T>, window: &TimeWindow) -> Vec<T> {
    let mut kept: Vec<T> = rows
        .into_iter()
        .filter(|row| window.contains(row.start()))
        .collect();
    kept.sort_by(|a, b| a.bucket().cmp(b.bucket()));
    kept
}

/// All fuel rows of one resource and bucket, collapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTotal {
    pub resource_id: String,
    pub bucket: TimeBucket,
    pub value: f64,
    pub unit: String,
    pub by_fuel_type: BTreeMap<String, f64>,
}

/// Group fuel rows per time bucket, summing values into a total and a breakdown.
///
/// Every row of a bucket must share a unit; a disagreement is reported as
/// [`GridError::MixedUnits`] rather than summed. Rows of the same fuel type in
/// one bucket (different technologies) add up in the breakdown.
pub fn group_by_bucket(
    resource_id: &str,
    rows: Vec<FuelObservation>,
    window: &TimeWindow,
) -> GridResult<Vec<BucketTotal>> {
    let mut groups: BTreeMap<TimeBucket, BucketTotal> = BTreeMap::new();
    for row in filter_by_window(rows, window) {
        let entry = groups.entry(row.bucket).or_insert_with(|| BucketTotal {
            resource_id: resource_id.to_string(),
            bucket: row.bucket,
            value: 0.0,
            unit: row.unit.clone(),
            by_fuel_type: BTreeMap::new(),
        });
        if entry.unit != row.unit {
            return Err(GridError::MixedUnits {
                resource_id: resource_id.to_string(),
                start: row.bucket.start_datetime,
                first: entry.unit.clone(),
                other: row.unit,
            });
        }
        entry.value += row.value;
        *entry.by_fuel_type.entry(row.fuel_type).or_insert(0.0) += row.value;
    }
    Ok(groups.into_values().collect())
}

/// Generation of a resource for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationPoint {
    pub resource_id: String,
    #[serde(flatten)]
    pub bucket: TimeBucket,
    pub value: f64,
    pub unit: String,
    pub generation_by_fuel_type: BTreeMap<String, f64>,
}

impl From<BucketTotal> for GenerationPoint {
    fn from(total: BucketTotal) -> Self {
        Self {
            resource_id: total.resource_id,
            bucket: total.bucket,
            value: total.value,
            unit: total.unit,
            generation_by_fuel_type: total.by_fuel_type,
        }
    }
}

/// Installed capacity of a resource for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityPoint {
    pub resource_id: String,
    #[serde(flatten)]
    pub bucket: TimeBucket,
    pub value: f64,
    pub unit: String,
    pub generation_capacity: BTreeMap<String, f64>,
}

impl From<BucketTotal> for CapacityPoint {
    fn from(total: BucketTotal) -> Self {
        Self {
            resource_id: total.resource_id,
            bucket: total.bucket,
            value: total.value,
            unit: total.unit,
            generation_capacity: total.by_fuel_type,
        }
    }
}

pub fn generation_series(
    resource_id: &str,
    rows: Vec<FuelObservation>,
    window: &TimeWindow,
) -> GridResult<Vec<GenerationPoint>> {
    Ok(group_by_bucket(resource_id, rows, window)?
        .into_iter()
        .map(GenerationPoint::from)
        .collect())
}

pub fn capacity_series(
    resource_id: &str,
    rows: Vec<FuelObservation>,
    window: &TimeWindow,
) -> GridResult<Vec<CapacityPoint>> {
    Ok(group_by_bucket(resource_id, rows, window)?
        .into_iter()
        .map(CapacityPoint::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn hour(start: DateTime<Utc>) -> TimeBucket {
        TimeBucket::new(start, start + chrono::Duration::hours(1)).unwrap()
    }

    fn fuel(start: DateTime<Utc>, fuel_type: &str, value: f64, unit: &str) -> FuelObservation {
        FuelObservation {
            resource_id: "US-WECC-CISO".into(),
            bucket: hour(start),
            fuel_type: fuel_type.into(),
            technology: None,
            value,
            unit: unit.into(),
        }
    }

    #[test]
    fn test_single_bucket_breakdown_and_total() {
        let rows = vec![
            fuel(at(2021, 6, 1, 0), "solar", 100.0, "MWh"),
            fuel(at(2021, 6, 1, 0), "wind", 50.0, "MWh"),
        ];
        let series =
            generation_series("US-WECC-CISO", rows, &TimeWindow::unbounded()).unwrap();
        assert_eq!(series.len(), 1);
        let point = &series[0];
        assert_eq!(point.value, 150.0);
        assert_eq!(point.unit, "MWh");
        assert_eq!(point.bucket.start_datetime, at(2021, 6, 1, 0));
        assert_eq!(point.bucket.end_datetime, at(2021, 6, 1, 1));
        assert_eq!(point.generation_by_fuel_type["solar"], 100.0);
        assert_eq!(point.generation_by_fuel_type["wind"], 50.0);
    }

    #[test]
    fn test_disjoint_buckets_aggregate_independently() {
        let rows = vec![
            fuel(at(2021, 6, 1, 1), "solar", 10.0, "MWh"),
            fuel(at(2021, 6, 1, 0), "solar", 1.0, "MWh"),
            fuel(at(2021, 6, 1, 1), "wind", 20.0, "MWh"),
            fuel(at(2021, 6, 1, 0), "wind", 2.0, "MWh"),
        ];
        let all_values: f64 = rows.iter().map(|r| r.value).sum();
        let series = group_by_bucket("US-WECC-CISO", rows, &TimeWindow::unbounded()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].bucket.start_datetime, at(2021, 6, 1, 0));
        assert_eq!(series[0].value, 3.0);
        assert_eq!(series[1].value, 30.0);
        assert_eq!(series[0].value + series[1].value, all_values);
    }

    #[test]
    fn test_window_filters_whole_buckets_by_start() {
        let rows = vec![
            fuel(at(2021, 1, 1, 0), "solar", 1.0, "MWh"),
            fuel(at(2021, 2, 1, 0), "solar", 2.0, "MWh"),
            fuel(at(2021, 3, 1, 0), "solar", 3.0, "MWh"),
        ];
        let window = TimeWindow::new(Some(at(2021, 1, 15, 0)), None);
        let series = generation_series("US-WECC-CISO", rows, &window).unwrap();
        let starts: Vec<_> = series.iter().map(|p| p.bucket.start_datetime).collect();
        assert_eq!(starts, vec![at(2021, 2, 1, 0), at(2021, 3, 1, 0)]);
    }

    #[test]
    fn test_end_bound_is_inclusive() {
        let rows = vec![
            fuel(at(2021, 1, 1, 0), "solar", 1.0, "MWh"),
            fuel(at(2021, 2, 1, 0), "solar", 2.0, "MWh"),
        ];
        let window = TimeWindow::new(None, Some(at(2021, 2, 1, 0)));
        let series = capacity_series("US-WECC-CISO", rows, &window).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].generation_capacity["solar"], 2.0);
    }

    #[test]
    fn test_mixed_units_in_one_bucket_is_an_error() {
        let rows = vec![
            fuel(at(2021, 6, 1, 0), "solar", 100.0, "MWh"),
            fuel(at(2021, 6, 1, 0), "wind", 50.0, "kWh"),
        ];
        let err = group_by_bucket("US-WECC-CISO", rows, &TimeWindow::unbounded()).unwrap_err();
        match err {
            GridError::MixedUnits { first, other, .. } => {
                assert_eq!(first, "MWh");
                assert_eq!(other, "kWh");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_different_units_across_buckets_are_fine() {
        let rows = vec![
            fuel(at(2021, 6, 1, 0), "solar", 100.0, "MWh"),
            fuel(at(2021, 6, 1, 1), "solar", 50.0, "kWh"),
        ];
        let series = group_by_bucket("US-WECC-CISO", rows, &TimeWindow::unbounded()).unwrap();
        assert_eq!(series[0].unit, "MWh");
        assert_eq!(series[1].unit, "kWh");
    }

    #[test]
    fn test_same_fuel_different_technology_sums_in_breakdown() {
        let mut pv = fuel(at(2021, 6, 1, 0), "solar", 100.0, "MWh");
        pv.technology = Some("photovoltaic".into());
        let mut csp = fuel(at(2021, 6, 1, 0), "solar", 25.0, "MWh");
        csp.technology = Some("concentrated".into());
        let series =
            group_by_bucket("US-WECC-CISO", vec![pv, csp], &TimeWindow::unbounded()).unwrap();
        assert_eq!(series[0].by_fuel_type["solar"], 125.0);
        assert_eq!(series[0].value, 125.0);
    }

    #[test]
    fn test_filter_by_window_sorts_plain_observations() {
        let obs = |start| Observation {
            resource_id: "GB".into(),
            bucket: hour(start),
            value: 1.0,
            unit: "MW".into(),
        };
        let rows = vec![obs(at(2021, 3, 1, 0)), obs(at(2021, 1, 1, 0))];
        let kept = filter_by_window(rows, &TimeWindow::unbounded());
        assert_eq!(kept[0].bucket.start_datetime, at(2021, 1, 1, 0));
    }

    #[test]
    fn test_generation_point_json_shape() {
        let rows = vec![fuel(at(2021, 6, 1, 0), "solar", 100.0, "MWh")];
        let series =
            generation_series("US-WECC-CISO", rows, &TimeWindow::unbounded()).unwrap();
        let json = serde_json::to_value(&series[0]).unwrap();
        assert_eq!(json["resource_id"], "US-WECC-CISO");
        assert_eq!(json["start_datetime"], "2021-06-01T00:00:00Z");
        assert_eq!(json["generation_by_fuel_type"]["solar"], 100.0);
    }
}
