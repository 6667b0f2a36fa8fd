//! Resource catalog and per-resource observation series.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use psda_core::{
    CapacityPoint, Exchange, GenerationPoint, Observation, Resource, ResourceDetail,
    ResourceType, TimeWindow,
};
use psda_db::ResourceFilter;

use crate::dto::{ListResourcesQuery, TransmissionCapacityResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Unwrap a query string or turn the rejection into a JSON 400.
fn query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(inner)| inner)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn list_resources(
    State(state): State<AppState>,
    params: Result<Query<ListResourcesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Resource>>> {
    let params = query(params)?;
    let filter = ResourceFilter {
        limit: params.limit,
        resource_type: params
            .resource_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ResourceType::from),
    };
    Ok(Json(state.store.list_resources(&filter).await?))
}

pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ResourceDetail>> {
    Ok(Json(state.store.describe_resource(&id).await?))
}

pub async fn get_generation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    window: Result<Query<TimeWindow>, QueryRejection>,
) -> ApiResult<Json<Vec<GenerationPoint>>> {
    let window = query(window)?;
    Ok(Json(state.store.generation(&id, &window).await?))
}

pub async fn get_capacity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    window: Result<Query<TimeWindow>, QueryRejection>,
) -> ApiResult<Json<Vec<CapacityPoint>>> {
    let window = query(window)?;
    Ok(Json(state.store.capacity(&id, &window).await?))
}

pub async fn get_demand(
    State(state): State<AppState>,
    Path(id): Path<String>,
    window: Result<Query<TimeWindow>, QueryRejection>,
) -> ApiResult<Json<Vec<Observation>>> {
    let window = query(window)?;
    Ok(Json(state.store.demand(&id, &window).await?))
}

pub async fn get_day_ahead_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    window: Result<Query<TimeWindow>, QueryRejection>,
) -> ApiResult<Json<Vec<Observation>>> {
    let window = query(window)?;
    Ok(Json(state.store.day_ahead_prices(&id, &window).await?))
}

pub async fn get_imports(
    State(state): State<AppState>,
    Path(id): Path<String>,
    window: Result<Query<TimeWindow>, QueryRejection>,
) -> ApiResult<Json<Vec<Exchange>>> {
    let window = query(window)?;
    Ok(Json(state.store.imports(&id, &window).await?))
}

pub async fn get_exports(
    State(state): State<AppState>,
    Path(id): Path<String>,
    window: Result<Query<TimeWindow>, QueryRejection>,
) -> ApiResult<Json<Vec<Exchange>>> {
    let window = query(window)?;
    Ok(Json(state.store.exports(&id, &window).await?))
}

pub async fn get_transmission_capacity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TransmissionCapacityResponse>> {
    let capacity = state.store.transmission_capacity(&id).await?;
    Ok(Json(TransmissionCapacityResponse { capacity }))
}
