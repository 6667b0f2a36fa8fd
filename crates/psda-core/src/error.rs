//! Unified error type for the power systems data API
//!
//! [`GridError`] covers every domain failure the ingestion and query layers can
//! raise. Variants that callers must tell apart (a missing resource, a registry
//! violation, a mixed-unit bucket) carry structured data so the API surface can
//! map them to client-facing responses without inspecting message strings.
//!
//! # Example
//!
//! ```
//! use psda_core::{GridError, GridResult};
//!
//! fn lookup(id: &str) -> GridResult<()> {
//!     Err(GridError::NotFound(id.to_string()))
//! }
//!
//! assert!(lookup("DOES-NOT-EXIST").unwrap_err().is_not_found());
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Domain error for ingestion, registry and query operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// A resource id referenced by a request does not exist in the store
    #[error("Could not find a power system resource with id: {0}")]
    NotFound(String),

    /// An ingested table references a resource id missing from the registry
    #[error("Resource '{id}' found in {origin} is not declared in the topology registry")]
    UnknownResource { id: String, origin: String },

    /// Rows of a single time bucket disagree on their unit
    #[error(
        "Mixed units for resource '{resource_id}' in bucket starting {start}: {first} vs {other}"
    )]
    MixedUnits {
        resource_id: String,
        start: DateTime<Utc>,
        first: String,
        other: String,
    },

    /// Parent/child relation is not a forest
    #[error("Hierarchy error: {0}")]
    Hierarchy(String),

    /// Parsing errors (timestamps, numbers, registry documents)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl GridError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GridError::NotFound(_))
    }
}

/// Convenience type alias for Results using GridError.
pub type GridResult<T> = Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        GridError::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        GridError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Parse(err.to_string())
    }
}
