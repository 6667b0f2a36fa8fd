//! # psda-core: Power Systems Reference Data Core
//!
//! Domain types and pure query logic for the power systems data API.
//!
//! ## Design Philosophy
//!
//! The catalog is a **forest of resources** (systems, markets, substations,
//! production and generation units) linked by `parent_id`. Observations hang
//! off resources and are always keyed by a [`TimeBucket`]:
//! - **Fuel observations**: generation and installed capacity, one row per fuel type
//! - **Plain observations**: demand and day-ahead prices
//! - **Exchanges**: signed flows on a directed `from -> to` edge
//!
//! Transmission capacities between neighbouring resources are kept alongside,
//! without a time bucket.
//!
//! Nothing in this crate touches the filesystem or a database. Readers live in
//! `psda-io`, persistence and seeding in `psda-db`.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use psda_core::*;
//!
//! let start = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2021, 6, 1, 1, 0, 0).unwrap();
//! let bucket = TimeBucket::new(start, end).unwrap();
//!
//! let rows = ["solar", "wind"].iter().zip([100.0, 50.0]).map(|(fuel, value)| {
//!     FuelObservation {
//!         resource_id: "US-WECC-CISO".to_string(),
//!         bucket,
//!         fuel_type: fuel.to_string(),
//!         technology: None,
//!         value,
//!         unit: "MWh".to_string(),
//!     }
//! });
//!
//! let series = generation_series("US-WECC-CISO", rows.collect(), &TimeWindow::unbounded())
//!     .unwrap();
//! assert_eq!(series[0].value, 150.0);
//! ```
//!
//! ## Modules
//!
//! - [`hierarchy`] - Parent/child validation and ordering (petgraph)
//! - [`query`] - Window filtering and per-bucket aggregation
//! - [`exchange`] - Import/export derivation from the directed exchange table
//! - [`transmission`] - Interconnection capacities grouped per unit
//! - [`diagnostics`] - Non-fatal issues collected during ingestion

pub mod diagnostics;
pub mod error;
pub mod exchange;
pub mod fuel;
pub mod hierarchy;
pub mod observation;
pub mod query;
pub mod resource;
pub mod time;
pub mod transmission;

pub use diagnostics::{DiagnosticIssue, Diagnostics};
pub use error::{GridError, GridResult};
pub use exchange::{exports, imports};
pub use fuel::{
    FuelTechnology, FuelType, FuelTypeInfo, FUEL_TYPE_EXTERNAL_REFERENCE,
    FUEL_TYPE_EXTERNAL_REFERENCE_URL,
};
pub use hierarchy::Hierarchy;
pub use observation::{Exchange, FuelObservation, Observation, ObservationKind, Timestamped};
pub use query::{
    capacity_series, filter_by_window, generation_series, group_by_bucket, BucketTotal,
    CapacityPoint, GenerationPoint,
};
pub use resource::{normalize_resource_id, Resource, ResourceDetail, ResourceType, TopologyLevel};
pub use time::{parse_timestamp, TimeBucket, TimeWindow};
pub use transmission::{
    transmission_capacity, ConnectedCapacity, Interconnection, TransmissionCapacity,
};
