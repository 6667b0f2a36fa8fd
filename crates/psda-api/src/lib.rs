//! # psda-api: HTTP surface
//!
//! Read-only REST endpoints over the store, plus a seeding trigger.
//!
//! ## Endpoints
//!
//! ### Resources
//! - GET /resources - List resources (`limit`, `type`)
//! - GET /resources/:id - Resource with its children ids
//! - GET /resources/:id/generation - Generation per bucket with fuel breakdown
//! - GET /resources/:id/capacity - Installed capacity per bucket with fuel breakdown
//! - GET /resources/:id/demand - Demand series
//! - GET /resources/:id/dayAheadPrice - Day-ahead price series
//! - GET /resources/:id/imports - Flows into the resource
//! - GET /resources/:id/exports - Flows out of the resource
//! - GET /resources/:id/transmission-capacity - Interconnection limits per unit
//!
//! Series endpoints accept `start_datetime` and `end_datetime`, inclusive,
//! applied to bucket starts.
//!
//! ### Metadata
//! - GET /metadata/fuel-types
//! - GET /metadata/fuel-technologies
//! - GET /metadata/topology-levels
//!
//! ### Operations
//! - POST /admin/seed - Reload the registry and seed sources
//! - GET /health
//! - GET, POST /echo
//!
//! Errors are returned as `{"error": "...", "code": "..."}`.

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::*;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use server::{build_app, run_server};
pub use state::AppState;
