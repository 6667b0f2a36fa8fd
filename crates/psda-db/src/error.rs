//! Error type for the store and the seeding pipeline.

use psda_core::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite or pool failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Domain error raised while querying or validating
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Reading the registry or a source table failed
    #[error("Ingestion error: {0:#}")]
    Ingest(#[from] anyhow::Error),

    /// Another seeding run holds the ingestion lock
    #[error("A seeding run is already in progress")]
    SeedInProgress,
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::Grid(GridError::NotFound(id.into()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Grid(err) if err.is_not_found())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
