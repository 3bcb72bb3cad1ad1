//! Units: a named conversion pair bound to a quantity kind

use std::fmt;
use std::sync::Arc;
use tracing::trace;
use crate::conversion::ConversionFunctionPair;
use crate::kind::{KindRef, Scaling};
use crate::{Error, Measurement, Result};

/// Immutable description of one unit: display name, symbol and conversion pair
#[derive(Debug, Clone)]
pub struct UnitDefinition {
    name: String,
    symbol: String,
    conversion: ConversionFunctionPair,
}

impl UnitDefinition {
    pub fn new(name: &str, symbol: &str, conversion: ConversionFunctionPair) -> Self {
        UnitDefinition {
            name: name.to_string(),
            symbol: symbol.to_string(),
            conversion,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn conversion(&self) -> &ConversionFunctionPair {
        &self.conversion
    }
}

/// A concrete unit system instance of a kind, e.g. metric or imperial distance.
///
/// Every conversion goes through the kind's base unit: converting feet to
/// miles is `mile.from_base(foot.to_base(x))`, never a direct feet-to-miles
/// function. Cloning shares the underlying definition.
#[derive(Debug, Clone)]
pub struct Quantity {
    kind: KindRef,
    definition: Arc<UnitDefinition>,
}

impl Quantity {
    /// Build a unit from a name and its two conversion functions. Under a
    /// linear kind the functions must be a pure scale of the base unit.
    pub fn new<T, F>(kind: KindRef, name: &str, to_base: T, from_base: F) -> Result<Self>
    where
        T: Fn(f64) -> f64 + Send + Sync + 'static,
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let conversion = ConversionFunctionPair::new(to_base, from_base);
        Quantity::with_definition(kind, UnitDefinition::new(name, name, conversion))
    }

    /// The canonical unit of a kind; both conversions are the identity
    pub fn base(kind: KindRef) -> Self {
        let symbol = kind.base_unit().to_string();
        let definition = UnitDefinition::new(&symbol, &symbol, ConversionFunctionPair::identity());
        Quantity {
            kind,
            definition: Arc::new(definition),
        }
    }

    /// Bind a definition to a kind. Kinds that only accept linear units
    /// refuse any conversion that is not a pure scale of the base unit:
    /// affine pairs, and closure pairs that fail the proportionality probe.
    pub fn with_definition(kind: KindRef, definition: UnitDefinition) -> Result<Self> {
        if kind.scaling() == Scaling::Linear && definition.conversion.linear_factor().is_none() {
            return Err(Error::NonLinearUnit {
                kind: kind.name().to_string(),
                unit: definition.name.clone(),
            });
        }
        Ok(Quantity {
            kind,
            definition: Arc::new(definition),
        })
    }

    /// Re-home this unit under a compatible kind, e.g. a `Distance^2` unit
    /// under a kind registered as "Area".
    pub fn rebind(&self, kind: KindRef) -> Result<Quantity> {
        self.kind.ensure_compatible(&kind)?;
        Ok(Quantity {
            kind,
            definition: Arc::clone(&self.definition),
        })
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn symbol(&self) -> &str {
        self.definition.symbol()
    }

    pub fn kind(&self) -> &KindRef {
        &self.kind
    }

    pub fn definition(&self) -> &UnitDefinition {
        &self.definition
    }

    pub fn conversion(&self) -> &ConversionFunctionPair {
        self.definition.conversion()
    }

    /// True when this unit is the identity of its kind's base unit
    pub fn is_base(&self) -> bool {
        self.conversion().is_identity()
    }

    /// Convert a value in this unit to the kind's base unit
    pub fn to_base(&self, value: f64) -> Result<f64> {
        check_finite(value)?;
        let base = self.conversion().to_base(value);
        trace!(unit = self.name(), value, base, "to_base");
        self.check_result(base)
    }

    /// Convert a base-unit magnitude to this unit
    pub fn from_base(&self, base_value: f64) -> Result<f64> {
        check_finite(base_value)?;
        let value = self.conversion().from_base(base_value);
        trace!(unit = self.name(), base_value, value, "from_base");
        self.check_result(value)
    }

    /// Convert a value in this unit to `target`, through the base unit
    pub fn convert_to(&self, target: &Quantity, value: f64) -> Result<f64> {
        self.kind.ensure_compatible(&target.kind)?;
        let base = self.to_base(value)?;
        target.from_base(base)
    }

    /// Tag a value with this unit
    pub fn measure(&self, value: f64) -> Result<Measurement> {
        Measurement::new(value, self.clone())
    }

    fn check_result(&self, value: f64) -> Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::NonFiniteResult(self.name().to_string()))
        }
    }
}

fn check_finite(value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidValue(value))
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.kind.is_compatible(&other.kind)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
