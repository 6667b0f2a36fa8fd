//! Request and response bodies that are not plain domain values.

use psda_core::{
    FuelTechnology, FuelTypeInfo, TopologyLevel, TransmissionCapacity,
    FUEL_TYPE_EXTERNAL_REFERENCE, FUEL_TYPE_EXTERNAL_REFERENCE_URL,
};
use serde::{Deserialize, Serialize};

fn default_limit() -> u32 {
    10
}

/// Query string of `GET /resources`.
#[derive(Debug, Deserialize)]
pub struct ListResourcesQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FuelTypesResponse {
    pub external_reference: String,
    pub external_reference_url: String,
    pub types: Vec<FuelTypeInfo>,
}

impl FuelTypesResponse {
    pub fn new(types: Vec<FuelTypeInfo>) -> Self {
        Self {
            external_reference: FUEL_TYPE_EXTERNAL_REFERENCE.to_string(),
            external_reference_url: FUEL_TYPE_EXTERNAL_REFERENCE_URL.to_string(),
            types,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FuelTechnologiesResponse {
    pub fuel_technologies: Vec<FuelTechnology>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopologyLevelsResponse {
    pub topology_levels: Vec<TopologyLevel>,
}

/// Body of `GET /resources/:id/transmission-capacity`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransmissionCapacityResponse {
    pub capacity: Vec<TransmissionCapacity>,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /admin/seed`; every field is optional.
#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub delete_existing: bool,
    #[serde(default)]
    pub keep_existing_resources: bool,
}

impl Default for SeedRequest {
    fn default() -> Self {
        Self {
            sources: None,
            delete_existing: true,
            keep_existing_resources: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EchoMessage {
    #[serde(default)]
    pub message: Option<String>,
}
