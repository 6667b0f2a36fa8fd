//! Fuel type classification.
//!
//! Fuel types arrive as column headers of wide generation/capacity tables
//! ("Solar", "natural gas", "Hydro") and as registry entries. Every spelling is
//! folded to one canonical snake_case name; anything outside the known set is
//! kept verbatim as [`FuelType::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary energy source classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FuelType {
    BrownCoal,
    HardCoal,
    CoalDerivedGas,
    OtherCoal,
    NaturalGas,
    LandfillGas,
    OtherGas,
    Wood,
    Biomass,
    MunicipalWaste,
    PropaneOil,
    ShaleOil,
    DistillateOil,
    OtherOil,
    Peat,
    Uranium,
    Thorium,
    Plutonium,
    Nuclear,
    Solar,
    Wind,
    Geothermal,
    Water,
    Battery,
    Other(String),
}

impl FuelType {
    /// Every named fuel type, in declaration order.
    pub const KNOWN: [FuelType; 24] = [
        FuelType::BrownCoal,
        FuelType::HardCoal,
        FuelType::CoalDerivedGas,
        FuelType::OtherCoal,
        FuelType::NaturalGas,
        FuelType::LandfillGas,
        FuelType::OtherGas,
        FuelType::Wood,
        FuelType::Biomass,
        FuelType::MunicipalWaste,
        FuelType::PropaneOil,
        FuelType::ShaleOil,
        FuelType::DistillateOil,
        FuelType::OtherOil,
        FuelType::Peat,
        FuelType::Uranium,
        FuelType::Thorium,
        FuelType::Plutonium,
        FuelType::Nuclear,
        FuelType::Solar,
        FuelType::Wind,
        FuelType::Geothermal,
        FuelType::Water,
        FuelType::Battery,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FuelType::BrownCoal => "brown_coal",
            FuelType::HardCoal => "hard_coal",
            FuelType::CoalDerivedGas => "coal_derived_gas",
            FuelType::OtherCoal => "other_coal",
            FuelType::NaturalGas => "natural_gas",
            FuelType::LandfillGas => "landfill_gas",
            FuelType::OtherGas => "other_gas",
            FuelType::Wood => "wood",
            FuelType::Biomass => "biomass",
            FuelType::MunicipalWaste => "municipal_waste",
            FuelType::PropaneOil => "propane_oil",
            FuelType::ShaleOil => "shale_oil",
            FuelType::DistillateOil => "distillate_oil",
            FuelType::OtherOil => "other_oil",
            FuelType::Peat => "peat",
            FuelType::Uranium => "uranium",
            FuelType::Thorium => "thorium",
            FuelType::Plutonium => "plutonium",
            FuelType::Nuclear => "nuclear",
            FuelType::Solar => "solar",
            FuelType::Wind => "wind",
            FuelType::Geothermal => "geothermal",
            FuelType::Water => "water",
            FuelType::Battery => "battery",
            FuelType::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FuelType::Other(_))
    }
}

/// Fold a header or registry spelling into canonical snake_case.
///
/// Unit suffixes in parentheses are dropped, so `"Coal (MW)"` becomes `"coal"`.
fn canonical_name(raw: &str) -> String {
    let without_unit = match raw.find('(') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    let mut out = String::with_capacity(without_unit.len());
    let mut pending_sep = false;
    for ch in without_unit.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

impl From<&str> for FuelType {
    fn from(value: &str) -> Self {
        let name = canonical_name(value);
        match name.as_str() {
            "brown_coal" | "lignite" => FuelType::BrownCoal,
            "hard_coal" | "coal" => FuelType::HardCoal,
            "coal_derived_gas" => FuelType::CoalDerivedGas,
            "other_coal" => FuelType::OtherCoal,
            "natural_gas" | "gas" => FuelType::NaturalGas,
            "landfill_gas" => FuelType::LandfillGas,
            "other_gas" => FuelType::OtherGas,
            "wood" => FuelType::Wood,
            "biomass" => FuelType::Biomass,
            "municipal_waste" | "waste" => FuelType::MunicipalWaste,
            "propane_oil" => FuelType::PropaneOil,
            "shale_oil" => FuelType::ShaleOil,
            "distillate_oil" => FuelType::DistillateOil,
            "other_oil" | "oil" | "petroleum" => FuelType::OtherOil,
            "peat" => FuelType::Peat,
            "uranium" => FuelType::Uranium,
            "thorium" => FuelType::Thorium,
            "plutonium" => FuelType::Plutonium,
            "nuclear" => FuelType::Nuclear,
            "solar" => FuelType::Solar,
            "wind" => FuelType::Wind,
            "geothermal" => FuelType::Geothermal,
            "water" | "hydro" => FuelType::Water,
            "battery" | "battery_storage" => FuelType::Battery,
            _ => FuelType::Other(name),
        }
    }
}

impl From<String> for FuelType {
    fn from(value: String) -> Self {
        FuelType::from(value.as_str())
    }
}

impl From<FuelType> for String {
    fn from(value: FuelType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fuel type row of the reference store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTypeInfo {
    pub name: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
}

impl FuelTypeInfo {
    pub fn named(fuel: &FuelType) -> Self {
        Self {
            name: fuel.as_str().to_string(),
            external_id: None,
            external_reference: None,
        }
    }
}

/// Finer-grained classification nested under a fuel type (e.g. solar → photovoltaic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTechnology {
    pub name: String,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
}

/// AIB fact sheet the fuel type external ids refer to.
pub const FUEL_TYPE_EXTERNAL_REFERENCE: &str = "AIB EECS Rule Fact Sheet 5";
pub const FUEL_TYPE_EXTERNAL_REFERENCE_URL: &str = "https://www.aib-net.org/sites/default/files/assets/eecs/facts-sheets/AIB-2019-EECSFS-05%20EECS%20Rules%20Fact%20Sheet%2005%20-%20Types%20of%20Energy%20Inputs%20and%20Technologies%20-%20Release%207.7%20v5.pdf";
