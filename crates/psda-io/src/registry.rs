//! Topology registry: the canonical list of resources and reference metadata.
//!
//! The registry is a YAML (or JSON) document:
//!
//! ```yaml
//! resources:
//!   - id: US-WECC
//!     name: Western Electricity Coordinating Council
//!     type: SYSTEM
//!     source: EIA
//!   - id: US-WECC-CISO
//!     name: California ISO
//!     type: MARKET
//!     parent_id: US-WECC
//!     source: EIA
//! fuel_types:
//!   - name: solar
//!     external_id: T010000
//! fuel_technologies:
//!   - name: photovoltaic
//!     fuel_type: solar
//! topology_levels:
//!   - id: SYSTEM
//!     level: 0
//! ```
//!
//! Ids are normalized to upper case on load and the parent relation is
//! validated through [`Hierarchy`]. A loaded [`Registry`] is never mutated;
//! seeding loads a fresh one per run.

use anyhow::{Context, Result};
use psda_core::{
    normalize_resource_id, Diagnostics, FuelTechnology, FuelType, FuelTypeInfo, Hierarchy,
    Resource, ResourceType, TopologyLevel,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// One resource declaration of the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Data source directory that reports on this resource (e.g. `EIA`).
    #[serde(default)]
    pub source: Option<String>,
}

impl RegistryEntry {
    pub fn to_resource(&self) -> Resource {
        Resource {
            id: self.id.clone(),
            name: self.name.clone(),
            resource_type: self.resource_type.clone(),
            parent_id: self.parent_id.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    resources: Vec<RegistryEntry>,
    #[serde(default)]
    fuel_types: Vec<FuelTypeInfo>,
    #[serde(default)]
    fuel_technologies: Vec<FuelTechnology>,
    #[serde(default)]
    topology_levels: Vec<TopologyLevel>,
}

/// Validated, immutable registry snapshot.
#[derive(Debug)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    by_id: HashMap<String, usize>,
    hierarchy: Hierarchy,
    fuel_types: Vec<FuelTypeInfo>,
    fuel_technologies: Vec<FuelTechnology>,
    topology_levels: Vec<TopologyLevel>,
    diagnostics: Diagnostics,
}

impl Registry {
    /// Read and validate a registry file. The format follows the extension;
    /// anything other than `.json` is read as YAML first.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading registry '{}'", path.display()))?;
        let document: RegistryDocument = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                serde_yaml::from_str(&data).context("parsing registry yaml")?
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => {
                serde_json::from_str(&data).context("parsing registry json")?
            }
            _ => serde_yaml::from_str(&data)
                .or_else(|_| serde_json::from_str(&data))
                .context("parsing registry")?,
        };
        Self::from_document(document)
            .with_context(|| format!("validating registry '{}'", path.display()))
    }

    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let document: RegistryDocument =
            serde_yaml::from_str(data).context("parsing registry yaml")?;
        Self::from_document(document)
    }

    fn from_document(document: RegistryDocument) -> Result<Self> {
        let mut diagnostics = Diagnostics::new();

        let entries: Vec<RegistryEntry> = document
            .resources
            .into_iter()
            .map(|mut entry| {
                entry.id = normalize_resource_id(&entry.id);
                entry.parent_id = entry
                    .parent_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|parent| !parent.is_empty())
                    .map(normalize_resource_id);
                entry.source = entry
                    .source
                    .as_deref()
                    .map(str::trim)
                    .filter(|source| !source.is_empty())
                    .map(str::to_string);
                entry
            })
            .collect();

        let resources: Vec<Resource> = entries.iter().map(RegistryEntry::to_resource).collect();
        let hierarchy = Hierarchy::build(&resources)?;
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.id.clone(), idx))
            .collect();

        let mut seen_fuels = BTreeSet::new();
        let mut fuel_types = Vec::with_capacity(document.fuel_types.len());
        for mut info in document.fuel_types {
            info.name = FuelType::from(info.name.as_str()).as_str().to_string();
            if !seen_fuels.insert(info.name.clone()) {
                diagnostics.warn(
                    "registry",
                    "fuel type declared more than once; keeping the first entry",
                    &info.name,
                );
                continue;
            }
            fuel_types.push(info);
        }

        let fuel_technologies = document
            .fuel_technologies
            .into_iter()
            .map(|mut tech| {
                tech.fuel_type = tech
                    .fuel_type
                    .map(|fuel| FuelType::from(fuel.as_str()).as_str().to_string());
                tech
            })
            .collect();

        let mut topology_levels = document.topology_levels;
        topology_levels.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.id.cmp(&b.id)));
        check_levels_contiguous(&topology_levels, &mut diagnostics);

        Ok(Self {
            entries,
            by_id,
            hierarchy,
            fuel_types,
            fuel_technologies,
            topology_levels,
            diagnostics,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.by_id.get(id).map(|idx| &self.entries[*idx])
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Distinct `source` values, sorted.
    pub fn sources(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| entry.source.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn fuel_types(&self) -> &[FuelTypeInfo] {
        &self.fuel_types
    }

    pub fn fuel_technologies(&self) -> &[FuelTechnology] {
        &self.fuel_technologies
    }

    /// Topology levels ordered by level.
    pub fn topology_levels(&self) -> &[TopologyLevel] {
        &self.topology_levels
    }

    /// Non-fatal findings from loading (duplicate fuel names, level gaps).
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

fn check_levels_contiguous(levels: &[TopologyLevel], diagnostics: &mut Diagnostics) {
    let distinct: BTreeSet<u32> = levels.iter().map(|level| level.level).collect();
    for (expected, actual) in (0u32..).zip(distinct.iter()) {
        if expected != *actual {
            diagnostics.warn(
                "registry",
                &format!("topology levels are not contiguous: expected level {expected}, found {actual}"),
                &actual.to_string(),
            );
            return;
        }
    }
}
