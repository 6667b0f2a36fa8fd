//! # psda-io: Source File Readers
//!
//! Parses the on-disk inputs of a seeding run into `psda-core` values:
//!
//! - [`registry`] - the topology registry (YAML or JSON)
//! - [`wide`] - wide generation/capacity tables, melted to one row per fuel type
//! - [`narrow`] - demand, day-ahead price, exchange and transmission capacity tables
//! - [`source`] - every table of one `<data dir>/<SOURCE>/` directory
//!
//! Readers never touch the store. Problems that should stop a run are
//! returned as errors with the file and line in their context; anything the
//! run can continue past is collected as [`psda_core::Diagnostics`].

pub mod narrow;
pub mod registry;
pub mod source;
mod table;
pub mod wide;

pub use narrow::{
    parse_exchanges, parse_interconnections, parse_observations, read_exchanges,
    read_interconnections, read_observations, NarrowRead,
};
pub use registry::{Registry, RegistryEntry};
pub use source::{read_source, source_dir, SourceTables};
pub use wide::{melt, read_wide, WideRead};
