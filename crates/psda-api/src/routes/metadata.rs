//! Reference metadata: fuel types, fuel technologies, topology levels.

use axum::{extract::State, Json};

use crate::dto::{FuelTechnologiesResponse, FuelTypesResponse, TopologyLevelsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn fuel_types(State(state): State<AppState>) -> ApiResult<Json<FuelTypesResponse>> {
    let types = state.store.fuel_types().await?;
    Ok(Json(FuelTypesResponse::new(types)))
}

pub async fn fuel_technologies(
    State(state): State<AppState>,
) -> ApiResult<Json<FuelTechnologiesResponse>> {
    Ok(Json(FuelTechnologiesResponse {
        fuel_technologies: state.store.fuel_technologies().await?,
    }))
}

pub async fn topology_levels(
    State(state): State<AppState>,
) -> ApiResult<Json<TopologyLevelsResponse>> {
    Ok(Json(TopologyLevelsResponse {
        topology_levels: state.store.topology_levels().await?,
    }))
}
