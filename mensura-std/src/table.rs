//! Unit tables: kinds and units described as JSON
//!
//! ```json
//! {
//!   "kinds": [
//!     {
//!       "name": "Distance",
//!       "base": "m",
//!       "units": [
//!         { "name": "furlong", "symbol": "fur", "factor": 201.168, "aliases": ["furlongs"] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Applying a table to a registry that already holds a kind adds units to
//! it, as long as the base unit agrees.

use serde::{Deserialize, Serialize};
use tracing::debug;
use mensura_core::{QuantityKind, QuantityRegistry, Scaling};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitTable {
    #[serde(default)]
    pub kinds: Vec<KindSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindSpec {
    pub name: String,
    pub base: String,
    #[serde(default = "default_scaling")]
    pub scaling: Scaling,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    /// Defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Base units per one of this unit
    pub factor: f64,
    /// Added after scaling: `base = value * factor + offset`
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offset: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

fn default_scaling() -> Scaling {
    Scaling::Linear
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

impl UnitTable {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register every kind and unit of the table
    pub fn apply(&self, registry: &mut QuantityRegistry) -> Result<()> {
        for entry in &self.kinds {
            let kind = match entry.scaling {
                Scaling::Linear => QuantityKind::new(&entry.name, &entry.base),
                Scaling::Affine => QuantityKind::affine(&entry.name, &entry.base),
            };
            registry.register_kind(kind)?;

            for unit in &entry.units {
                let symbol = unit.symbol.as_deref().unwrap_or(&unit.name);
                if unit.offset == 0.0 {
                    registry.define_linear(&entry.name, &unit.name, symbol, unit.factor)?;
                } else {
                    registry.define_affine(&entry.name, &unit.name, symbol, unit.factor, unit.offset)?;
                }
                for alias in &unit.aliases {
                    registry.alias(&entry.name, alias, &unit.name)?;
                }
            }
            debug!(kind = %entry.name, units = entry.units.len(), "applied unit table");
        }
        Ok(())
    }
}
