//! Mensura Std - standard unit systems
//!
//! Kinds:
//! - Distance (m): mm, cm, km, in, ft, yd, mi, nmi, plus the "Metric" and
//!   "Imperial" unit systems
//! - Area (m^2): derived as Distance squared; square of every distance unit,
//!   hectare, acre
//! - Temperature (K): affine; celsius, fahrenheit, rankine
//!
//! Additional kinds and units can be loaded from a JSON [`UnitTable`].

mod area;
mod distance;
mod error;
mod table;
mod temperature;

pub use area::{register_area_units, AREA};
pub use distance::{register_distance_units, DISTANCE, FOOT, METER};
pub use error::{Error, Result};
pub use table::{KindSpec, UnitSpec, UnitTable};
pub use temperature::{register_temperature_units, KELVIN, TEMPERATURE};

use mensura_core::QuantityRegistry;

/// Load the standard kinds and units into a registry
pub fn load_standard_units(registry: &mut QuantityRegistry) -> Result<()> {
    register_distance_units(registry)?;
    register_area_units(registry)?;
    register_temperature_units(registry)?;
    Ok(())
}

/// A fresh registry holding the standard kinds and units
pub fn standard_registry() -> Result<QuantityRegistry> {
    let mut registry = QuantityRegistry::new();
    load_standard_units(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_kinds() {
        let reg = standard_registry().unwrap();
        let names: Vec<&str> = reg.kinds().map(|k| k.name()).collect();
        assert_eq!(names, vec![AREA, DISTANCE, TEMPERATURE]);
    }

    #[test]
    fn test_load_twice_fails_on_duplicate_units() {
        let mut reg = standard_registry().unwrap();
        assert!(load_standard_units(&mut reg).is_err());
    }
}
