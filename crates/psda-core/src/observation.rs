//! Time-stamped numeric facts attached to resources.
//!
//! Every observation carries a [`TimeBucket`], a value and a unit. The stored
//! shape differs per kind only in its identity fields; those fields together
//! with the bucket form the primary key in the store.

use crate::time::TimeBucket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which source table a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    Generation,
    Capacity,
    Demand,
    DayAheadPrice,
    Exchange,
    TransmissionCapacity,
}

impl ObservationKind {
    pub const ALL: [ObservationKind; 6] = [
        ObservationKind::Generation,
        ObservationKind::Capacity,
        ObservationKind::Demand,
        ObservationKind::DayAheadPrice,
        ObservationKind::Exchange,
        ObservationKind::TransmissionCapacity,
    ];

    /// File name of the source table for this kind inside a source directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ObservationKind::Generation => "generation.csv",
            ObservationKind::Capacity => "capacity.csv",
            ObservationKind::Demand => "demand.csv",
            ObservationKind::DayAheadPrice => "day_ahead_price.csv",
            ObservationKind::Exchange => "imports_exports.csv",
            ObservationKind::TransmissionCapacity => "transmission_capacity.csv",
        }
    }

    /// Whether the source table is wide (one column per fuel type).
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            ObservationKind::Generation | ObservationKind::Capacity
        )
    }
}

/// One (resource, bucket, fuel type) fact: a generation or capacity row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelObservation {
    pub resource_id: String,
    #[serde(flatten)]
    pub bucket: TimeBucket,
    pub fuel_type: String,
    pub technology: Option<String>,
    pub value: f64,
    pub unit: String,
}

/// One (resource, bucket) fact: a demand or day-ahead price row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub resource_id: String,
    #[serde(flatten)]
    pub bucket: TimeBucket,
    pub value: f64,
    pub unit: String,
}

/// A directed, signed flow between two resources.
///
/// A positive value on `from -> to` is a flow from `from` to `to`; a negative
/// value is a flow of the same magnitude in the opposite direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub resource_from_id: String,
    pub resource_to_id: String,
    #[serde(flatten)]
    pub bucket: TimeBucket,
    pub value: f64,
    pub unit: String,
}

impl Exchange {
    /// The same physical flow described from the opposite endpoint.
    pub fn reversed(&self) -> Exchange {
        Exchange {
            resource_from_id: self.resource_to_id.clone(),
            resource_to_id: self.resource_from_id.clone(),
            bucket: self.bucket,
            value: -self.value,
            unit: self.unit.clone(),
        }
    }
}

/// Access to the bucket start used for window filtering and ordering.
pub trait Timestamped {
    fn bucket(&self) -> &TimeBucket;

    fn start(&self) -> &DateTime<Utc> {
        &self.bucket().start_datetime
    }
}

impl Timestamped for FuelObservation {
    fn bucket(&self) -> &TimeBucket {
        &self.bucket
    }
}

impl Timestamped for Observation {
    fn bucket(&self) -> &TimeBucket {
        &self.bucket
    }
}

impl Timestamped for Exchange {
    fn bucket(&self) -> &TimeBucket {
        &self.bucket
    }
}
