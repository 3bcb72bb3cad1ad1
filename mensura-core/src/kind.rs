//! Quantity kinds and their canonical base units

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use crate::{Dimension, Error, Result};

/// Shared handle to a kind. Kinds are created once and read by every unit
/// that belongs to them.
pub type KindRef = Arc<QuantityKind>;

/// How the units of a kind relate to its base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scaling {
    /// Units are pure scale factors of the base unit. Such kinds can be
    /// squared, multiplied and divided into derived kinds.
    Linear,
    /// Units may carry an offset (temperature scales). Derivation is refused.
    Affine,
}

impl Scaling {
    pub fn is_derivable(self) -> bool {
        matches!(self, Scaling::Linear)
    }
}

/// A measurable concept such as Distance or Area, with exactly one base unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantityKind {
    name: String,
    base_unit: String,
    dimension: Dimension,
    scaling: Scaling,
    /// Base unit symbol of every base kind in the dimension
    #[serde(default)]
    base_symbols: BTreeMap<String, String>,
}

impl QuantityKind {
    /// A linear base kind, e.g. `QuantityKind::new("Distance", "m")`
    pub fn new(name: &str, base_unit: &str) -> Self {
        let mut base_symbols = BTreeMap::new();
        base_symbols.insert(name.to_string(), base_unit.to_string());
        QuantityKind {
            name: name.to_string(),
            base_unit: base_unit.to_string(),
            dimension: Dimension::base(name),
            scaling: Scaling::Linear,
            base_symbols,
        }
    }

    /// A base kind whose units may be offset from the base unit
    pub fn affine(name: &str, base_unit: &str) -> Self {
        QuantityKind {
            scaling: Scaling::Affine,
            ..QuantityKind::new(name, base_unit)
        }
    }

    /// A linear kind for `dimension`, named after it. The base unit is
    /// spelled from the dimension alone, so `m * m^2` and `m^2 * m` both
    /// give `m^3` and `m^2 / m` gives `m`.
    pub(crate) fn derived(dimension: Dimension, mut base_symbols: BTreeMap<String, String>) -> Self {
        base_symbols.retain(|kind, _| dimension.exponent(kind) != 0);
        QuantityKind {
            name: dimension.to_string(),
            base_unit: canonical_base_unit(&dimension, &base_symbols),
            dimension,
            scaling: Scaling::Linear,
            base_symbols,
        }
    }

    /// Rename the kind, keeping its dimension and base unit. Used to give a
    /// derived kind such as `Distance^2` its usual name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_unit(&self) -> &str {
        &self.base_unit
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    /// Base unit symbols of the base kinds this kind is built from
    pub fn base_symbols(&self) -> &BTreeMap<String, String> {
        &self.base_symbols
    }

    pub fn is_derivable(&self) -> bool {
        self.scaling.is_derivable()
    }

    /// Two kinds are compatible when they measure the same dimension in the
    /// same base unit. A kind registered as "Area" is compatible with the
    /// anonymous `Distance^2` kind produced by multiplying two distances.
    pub fn is_compatible(&self, other: &QuantityKind) -> bool {
        self.dimension == other.dimension && self.base_unit == other.base_unit
    }

    pub fn ensure_compatible(&self, other: &QuantityKind) -> Result<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(Error::incompatible(&self.name, &other.name))
        }
    }
}

/// Spell a base unit from exponents: numerator terms, then denominator
/// terms, each ordered by base kind name (`m^2`, `m/s`, `m*kg/s^2`).
fn canonical_base_unit(dimension: &Dimension, symbols: &BTreeMap<String, String>) -> String {
    let term = |kind: &str, exp: i32| {
        let symbol = symbols.get(kind).map(String::as_str).unwrap_or(kind);
        let symbol = if exp != 1 && symbol.contains(['*', '/', '^', ' ']) {
            format!("({})", symbol)
        } else {
            symbol.to_string()
        };
        if exp == 1 {
            symbol
        } else {
            format!("{}^{}", symbol, exp)
        }
    };

    let numerator: Vec<String> = dimension
        .terms()
        .filter(|&(_, exp)| exp > 0)
        .map(|(kind, exp)| term(kind, exp))
        .collect();
    let denominator: Vec<String> = dimension
        .terms()
        .filter(|&(_, exp)| exp < 0)
        .map(|(kind, exp)| term(kind, -exp))
        .collect();

    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("*")
    };
    match denominator.len() {
        0 => numerator,
        1 => format!("{}/{}", numerator, denominator[0]),
        _ => format!("{}/({})", numerator, denominator.join("*")),
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.base_unit)
    }
}
