//! # psda-db: SQLite Store and Seeding
//!
//! Persistence for the power systems data API on top of `sqlx` and SQLite.
//!
//! - [`GridStore`] - pooled handle with resource, metadata and observation reads
//! - [`store`] - upserts used by seeding, one transaction per run
//! - [`Seeder`] - exclusive, reload-on-reseed ingestion of the registry and sources
//! - [`query`] - the read operations exposed over HTTP (not-found checks plus
//!   aggregation from `psda_core`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use psda_db::{GridStore, SeedOptions, Seeder};
//! use psda_core::TimeWindow;
//!
//! # async fn run() -> Result<(), psda_db::StoreError> {
//! let store = GridStore::connect("sqlite://psda.db", 5).await?;
//! let seeder = Seeder::new(store.clone(), "data", "data/registry.yaml");
//! let report = seeder.run(&SeedOptions::default()).await?;
//! println!("seeded {:?}", report.sources_processed);
//!
//! let series = store.generation("US-WECC-CISO", &TimeWindow::unbounded()).await?;
//! println!("{} buckets", series.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod query;
pub mod schema;
pub mod seed;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use schema::{FuelTable, SeriesTable};
pub use seed::{SeedOptions, SeedReport, Seeder};
pub use store::{GridStore, ResourceFilter, TableCounts, WriteMode};
