//! Compound kinds: building Area from Distance and similar
//!
//! A derived kind is structural. Its dimension and base unit are the
//! algebraic combination of its components, and a derived unit's scale
//! factor is the same combination of the component units' factors. Only
//! pure linear scales can be combined this way.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use crate::conversion::ConversionFunctionPair;
use crate::kind::{KindRef, QuantityKind};
use crate::unit::{Quantity, UnitDefinition};
use crate::{Error, Result};

/// How a derived kind or unit is built from its component(s)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator<T> {
    /// `x * x`, e.g. Area from Distance
    Square,
    /// `x * rhs`
    Product(T),
    /// `x / rhs`
    Ratio(T),
}

impl<T> Operator<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Operator<U> {
        match self {
            Operator::Square => Operator::Square,
            Operator::Product(rhs) => Operator::Product(f(rhs)),
            Operator::Ratio(rhs) => Operator::Ratio(f(rhs)),
        }
    }
}

/// Derive a new kind from `base`.
///
/// The result depends only on the combined dimension: `a * b` and `b * a`
/// are the same kind, `(a * b) / b` is compatible with `a`, and dividing a
/// kind by a compatible kind yields a dimensionless kind with base unit `1`.
/// Kinds with affine units cannot be derived, and operands that spell the
/// same base kind with different base units are incompatible.
pub fn derive(base: &QuantityKind, op: Operator<&QuantityKind>) -> Result<QuantityKind> {
    ensure_derivable(base)?;

    let kind = match op {
        Operator::Square => {
            QuantityKind::derived(base.dimension().power(2), base.base_symbols().clone())
        }
        Operator::Product(rhs) => {
            ensure_derivable(rhs)?;
            QuantityKind::derived(base.dimension().multiply(rhs.dimension()), merge_symbols(base, rhs)?)
        }
        Operator::Ratio(rhs) => {
            ensure_derivable(rhs)?;
            QuantityKind::derived(base.dimension().divide(rhs.dimension()), merge_symbols(base, rhs)?)
        }
    };

    debug!(base = base.name(), derived = kind.name(), base_unit = kind.base_unit(), "derived kind");
    Ok(kind)
}

/// Derive a unit from `component` by combining its scale factor.
///
/// The kilometer (`to_base(1) = 1000`) squares to a square kilometer with
/// `to_base(1) = 1_000_000`. Units that are not a pure linear scale fail
/// with [`Error::NonLinearDerivation`].
pub fn derive_unit(component: &Quantity, op: Operator<&Quantity>) -> Result<Quantity> {
    let factor = linear_factor(component)?;

    let (kind, definition) = match op {
        Operator::Square => {
            let kind = derive(component.kind(), Operator::Square)?;
            let definition = UnitDefinition::new(
                &format!("square {}", component.name()),
                &format!("{}^2", component.symbol()),
                ConversionFunctionPair::linear(factor * factor)?,
            );
            (kind, definition)
        }
        Operator::Product(rhs) => {
            let rhs_factor = linear_factor(rhs)?;
            let kind = derive(component.kind(), Operator::Product(rhs.kind().as_ref()))?;
            let definition = if component == rhs {
                UnitDefinition::new(
                    &format!("square {}", component.name()),
                    &format!("{}^2", component.symbol()),
                    ConversionFunctionPair::linear(factor * factor)?,
                )
            } else {
                UnitDefinition::new(
                    &format!("{} {}", component.name(), rhs.name()),
                    &format!("{}*{}", component.symbol(), rhs.symbol()),
                    ConversionFunctionPair::linear(factor * rhs_factor)?,
                )
            };
            (kind, definition)
        }
        Operator::Ratio(rhs) => {
            let rhs_factor = linear_factor(rhs)?;
            let kind = derive(component.kind(), Operator::Ratio(rhs.kind().as_ref()))?;
            let definition = UnitDefinition::new(
                &format!("{} per {}", component.name(), rhs.name()),
                &format!("{}/{}", component.symbol(), rhs.symbol()),
                ConversionFunctionPair::linear(factor / rhs_factor)?,
            );
            (kind, definition)
        }
    };

    Quantity::with_definition(Arc::new(kind), definition)
}

fn merge_symbols(base: &QuantityKind, rhs: &QuantityKind) -> Result<BTreeMap<String, String>> {
    let mut symbols = base.base_symbols().clone();
    for (kind, symbol) in rhs.base_symbols() {
        match symbols.get(kind) {
            Some(existing) if existing != symbol => {
                return Err(Error::incompatible(base.name(), rhs.name()));
            }
            Some(_) => {}
            None => {
                symbols.insert(kind.clone(), symbol.clone());
            }
        }
    }
    Ok(symbols)
}

fn ensure_derivable(kind: &QuantityKind) -> Result<()> {
    if kind.is_derivable() {
        Ok(())
    } else {
        Err(Error::NonLinearDerivation(kind.name().to_string()))
    }
}

fn linear_factor(unit: &Quantity) -> Result<f64> {
    ensure_derivable(unit.kind())?;
    unit.conversion()
        .linear_factor()
        .ok_or_else(|| Error::NonLinearDerivation(unit.name().to_string()))
}

/// Derive a kind from a shared handle
pub fn derive_ref(base: &KindRef, op: Operator<&KindRef>) -> Result<KindRef> {
    derive(base, op.map(|rhs| &**rhs)).map(Arc::new)
}
