//! API route handlers

pub mod admin;
pub mod health;
pub mod metadata;
pub mod resources;

use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/echo", get(health::echo_get).post(health::echo_post))
        // Resources
        .route("/resources", get(resources::list_resources))
        .route("/resources/:id", get(resources::get_resource))
        .route("/resources/:id/generation", get(resources::get_generation))
        .route("/resources/:id/capacity", get(resources::get_capacity))
        .route("/resources/:id/demand", get(resources::get_demand))
        .route("/resources/:id/dayAheadPrice", get(resources::get_day_ahead_price))
        .route("/resources/:id/imports", get(resources::get_imports))
        .route("/resources/:id/exports", get(resources::get_exports))
        .route(
            "/resources/:id/transmission-capacity",
            get(resources::get_transmission_capacity),
        )
        // Metadata
        .route("/metadata/fuel-types", get(metadata::fuel_types))
        .route("/metadata/fuel-technologies", get(metadata::fuel_technologies))
        .route("/metadata/topology-levels", get(metadata::topology_levels))
        // Admin
        .route("/admin/seed", post(admin::seed))
        .with_state(state)
}
