//! Transmission capacity between connected resources.
//!
//! Unlike observations these rows carry no time bucket: each one states the
//! capacity of the interconnection from a resource to one neighbour.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stored interconnection row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interconnection {
    pub resource_id: String,
    pub connected_resource_id: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedCapacity {
    pub connected_resource_id: String,
    pub value: f64,
}

/// Interconnections of one resource sharing a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionCapacity {
    pub id: String,
    pub unit: String,
    pub transmission_capacity: Vec<ConnectedCapacity>,
}

/// Group the interconnections of `resource_id` per unit.
///
/// Groups are ordered by unit and neighbours by id; rows of other resources
/// are ignored.
pub fn transmission_capacity(
    resource_id: &str,
    rows: Vec<Interconnection>,
) -> Vec<TransmissionCapacity> {
    let mut by_unit: BTreeMap<String, Vec<ConnectedCapacity>> = BTreeMap::new();
    for row in rows.into_iter().filter(|row| row.resource_id == resource_id) {
        by_unit.entry(row.unit).or_default().push(ConnectedCapacity {
            connected_resource_id: row.connected_resource_id,
            value: row.value,
        });
    }
    by_unit
        .into_iter()
        .map(|(unit, mut links)| {
            links.sort_by(|a, b| a.connected_resource_id.cmp(&b.connected_resource_id));
            TransmissionCapacity {
                id: resource_id.to_string(),
                unit,
                transmission_capacity: links,
            }
        })
        .collect()
}
