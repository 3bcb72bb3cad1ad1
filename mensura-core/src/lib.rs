//! Mensura Core - quantity kinds and unit conversion
//!
//! A quantity kind (Distance, Area, Temperature) is defined once with a
//! canonical base unit. Any number of unit systems can then be plugged in as
//! a pair of conversion functions to and from that base unit, and every
//! conversion between two units of a kind goes through it:
//!
//! - `QuantityKind`: name, base unit, dimension and scaling capability
//! - `ConversionFunctionPair`: the `(to_base, from_base)` strategy of a unit
//! - `Quantity`: a named unit of a kind (metric distance, imperial distance)
//! - `Measurement`: a value tagged with a unit, with kind-checked arithmetic
//! - `derive` / `derive_unit`: compound kinds such as Area from Distance
//! - `QuantityRegistry`: lookup of kinds and units by name

mod conversion;
mod derive;
mod dimension;
mod error;
mod kind;
mod measurement;
mod registry;
mod tolerance;
mod unit;

pub use conversion::{ConversionForm, ConversionFunctionPair};
pub use derive::{derive, derive_ref, derive_unit, Operator};
pub use dimension::Dimension;
pub use error::{Error, Result};
pub use kind::{KindRef, QuantityKind, Scaling};
pub use measurement::Measurement;
pub use registry::{QuantityRegistry, SharedRegistry};
pub use tolerance::Tolerance;
pub use unit::{Quantity, UnitDefinition};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Error, KindRef, Measurement, Operator, Quantity, QuantityKind, QuantityRegistry, Result,
        Tolerance,
    };
}
