//! Parent/child structure of the resource catalog.
//!
//! The catalog must be a forest: every `parent_id` names a known resource and
//! following parents never loops. [`Hierarchy::build`] checks both and then
//! answers the questions seeding needs (ancestors of a resource, a
//! parents-first write order).

use crate::error::{GridError, GridResult};
use crate::resource::Resource;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Validated parent -> child graph over a resource catalog.
#[derive(Debug)]
pub struct Hierarchy {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
    parents: HashMap<String, String>,
}

impl Hierarchy {
    /// Build the hierarchy, rejecting duplicate ids, dangling parents and cycles.
    pub fn build(resources: &[Resource]) -> GridResult<Self> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::with_capacity(resources.len());
        for resource in resources {
            if index.contains_key(&resource.id) {
                return Err(GridError::Validation(format!(
                    "duplicate resource id '{}'",
                    resource.id
                )));
            }
            let node = graph.add_node(resource.id.clone());
            index.insert(resource.id.clone(), node);
        }

        let mut parents = HashMap::new();
        for resource in resources {
            let Some(parent_id) = &resource.parent_id else {
                continue;
            };
            let parent = index.get(parent_id).ok_or_else(|| {
                GridError::Hierarchy(format!(
                    "resource '{}' references unknown parent '{}'",
                    resource.id, parent_id
                ))
            })?;
            graph.add_edge(*parent, index[&resource.id], ());
            parents.insert(resource.id.clone(), parent_id.clone());
        }

        if is_cyclic_directed(&graph) {
            let members = cycle_members(&parents);
            return Err(GridError::Hierarchy(format!(
                "parent relation contains a cycle through {}",
                members.join(", ")
            )));
        }

        Ok(Self {
            graph,
            index,
            parents,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    /// Parents of `id`, nearest first. Empty for roots and unknown ids.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parents.get(current) {
            chain.push(parent.clone());
            current = parent.as_str();
        }
        chain
    }

    /// Immediate children of `id`, sorted by id.
    pub fn children(&self, id: &str) -> Vec<String> {
        let Some(node) = self.index.get(id) else {
            return Vec::new();
        };
        let mut children: Vec<String> = self
            .graph
            .neighbors(*node)
            .map(|child| self.graph[child].clone())
            .collect();
        children.sort();
        children
    }

    /// All resource ids ordered so that each parent precedes its children.
    pub fn parents_first(&self) -> Vec<String> {
        match toposort(&self.graph, None) {
            Ok(order) => order.into_iter().map(|n| self.graph[n].clone()).collect(),
            // build() rejected cycles, so toposort cannot fail
            Err(_) => Vec::new(),
        }
    }

    /// Close `ids` under the parent relation and order the result parents-first.
    pub fn with_ancestors<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        let mut wanted: HashSet<String> = HashSet::new();
        for id in ids {
            if wanted.insert(id.clone()) {
                wanted.extend(self.ancestors(id));
            }
        }
        self.parents_first()
            .into_iter()
            .filter(|id| wanted.contains(id))
            .collect()
    }
}

fn cycle_members(parents: &HashMap<String, String>) -> Vec<String> {
    for start in parents.keys() {
        let mut seen = Vec::new();
        let mut current = start;
        while let Some(parent) = parents.get(current) {
            if let Some(pos) = seen.iter().position(|id| id == parent) {
                let mut cycle: Vec<String> = seen[pos..].to_vec();
                cycle.sort();
                return cycle;
            }
            seen.push(parent.clone());
            current = parent;
        }
    }
    Vec::new()
}
