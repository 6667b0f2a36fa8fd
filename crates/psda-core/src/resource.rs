//! Power system resources (topology nodes) and topology levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topology level a resource belongs to.
///
/// Source data keeps adding levels, so anything unrecognised is carried as
/// [`ResourceType::Other`] instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    System,
    Market,
    Substation,
    ProductionUnit,
    GenerationUnit,
    Other(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::System => "SYSTEM",
            ResourceType::Market => "MARKET",
            ResourceType::Substation => "SUBSTATION",
            ResourceType::ProductionUnit => "PRODUCTION_UNIT",
            ResourceType::GenerationUnit => "GENERATION_UNIT",
            ResourceType::Other(name) => name,
        }
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "SYSTEM" => ResourceType::System,
            "MARKET" => ResourceType::Market,
            "SUBSTATION" => ResourceType::Substation,
            "PRODUCTION_UNIT" => ResourceType::ProductionUnit,
            "GENERATION_UNIT" => ResourceType::GenerationUnit,
            _ => ResourceType::Other(normalized),
        }
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        ResourceType::from(value.as_str())
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the grid topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub parent_id: Option<String>,
}

/// A resource together with the ids of its immediate children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDetail {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub parent_id: Option<String>,
    pub children_ids: Vec<String>,
}

impl ResourceDetail {
    pub fn new(resource: Resource, children_ids: Vec<String>) -> Self {
        Self {
            id: resource.id,
            name: resource.name,
            resource_type: resource.resource_type,
            parent_id: resource.parent_id,
            children_ids,
        }
    }
}

/// Hierarchy rank of a resource type; 0 is the top of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyLevel {
    pub id: String,
    pub level: u32,
}

/// Canonical form of a resource id as stored and looked up.
pub fn normalize_resource_id(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_parses_known_levels() {
        assert_eq!(ResourceType::from("system"), ResourceType::System);
        assert_eq!(
            ResourceType::from("generation unit"),
            ResourceType::GenerationUnit
        );
        assert_eq!(
            ResourceType::from("PRODUCTION_UNIT"),
            ResourceType::ProductionUnit
        );
    }

    #[test]
    fn test_resource_type_falls_back_to_other() {
        let parsed = ResourceType::from("balancing-area");
        assert_eq!(parsed, ResourceType::Other("BALANCING_AREA".into()));
        assert_eq!(parsed.as_str(), "BALANCING_AREA");
    }

    #[test]
    fn test_resource_serializes_type_field() {
        let resource = Resource {
            id: "US-WECC-CISO".into(),
            name: "California ISO".into(),
            resource_type: ResourceType::Market,
            parent_id: Some("US-WECC".into()),
        };
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["type"], "MARKET");
        assert_eq!(json["parent_id"], "US-WECC");
    }

    #[test]
    fn test_normalize_resource_id() {
        assert_eq!(normalize_resource_id(" eia-ciso "), "EIA-CISO");
    }
}
