//! Dimensional signature of a quantity kind
//!
//! A dimension is a product of base kinds raised to integer exponents.
//! A base kind such as Distance has the dimension `Distance^1`; Area derived
//! from it has `Distance^2`; a speed would be `Distance Time^-1`.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};

/// Exponents of the base kinds a kind is built from. Zero exponents are
/// never stored, so two dimensions are equal exactly when they describe
/// the same product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    exponents: BTreeMap<String, i32>,
}

impl Dimension {
    /// Dimensionless (empty product)
    pub fn dimensionless() -> Self {
        Dimension::default()
    }

    /// Dimension of a base kind
    pub fn base(kind: &str) -> Self {
        let mut exponents = BTreeMap::new();
        exponents.insert(kind.to_string(), 1);
        Dimension { exponents }
    }

    /// Exponent of the given base kind (zero when absent)
    pub fn exponent(&self, kind: &str) -> i32 {
        self.exponents.get(kind).copied().unwrap_or(0)
    }

    /// Base kinds with their non-zero exponents, ordered by kind name
    pub fn terms(&self) -> impl Iterator<Item = (&str, i32)> {
        self.exponents.iter().map(|(name, &exp)| (name.as_str(), exp))
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.is_empty()
    }

    /// The base kind name when this is exactly one base kind to the first power
    pub fn as_base(&self) -> Option<&str> {
        match self.exponents.iter().next() {
            Some((name, 1)) if self.exponents.len() == 1 => Some(name.as_str()),
            _ => None,
        }
    }

    /// Multiply dimensions (add exponents)
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        self.combine(other, 1)
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.combine(other, -1)
    }

    /// Raise to integer power (multiply exponents)
    pub fn power(&self, exp: i32) -> Dimension {
        if exp == 0 {
            return Dimension::dimensionless();
        }
        let exponents = self
            .exponents
            .iter()
            .map(|(name, e)| (name.clone(), e * exp))
            .collect();
        Dimension { exponents }
    }

    /// Invert dimensions (negate exponents)
    pub fn invert(&self) -> Dimension {
        self.power(-1)
    }

    fn combine(&self, other: &Dimension, sign: i32) -> Dimension {
        let mut exponents = self.exponents.clone();
        for (name, exp) in &other.exponents {
            let entry = exponents.entry(name.clone()).or_insert(0);
            *entry += sign * exp;
            if *entry == 0 {
                exponents.remove(name);
            }
        }
        Dimension { exponents }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponents.is_empty() {
            return write!(f, "1");
        }

        let parts: Vec<String> = self
            .exponents
            .iter()
            .map(|(name, &exp)| {
                if exp == 1 {
                    name.clone()
                } else {
                    format!("{}^{}", name, exp)
                }
            })
            .collect();

        write!(f, "{}", parts.join(" "))
    }
}
