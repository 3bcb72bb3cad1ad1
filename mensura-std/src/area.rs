//! Area, derived as Distance squared

use mensura_core::{Operator, QuantityRegistry, Result};
use crate::distance::{self, DISTANCE};

pub const AREA: &str = "Area";

/// Register Area as the square of Distance, with the square of every
/// scaled distance unit plus hectare and acre. Distance must already be
/// registered.
pub fn register_area_units(registry: &mut QuantityRegistry) -> Result<()> {
    let area = registry.register_derived(AREA, DISTANCE, Operator::Square)?;

    for name in distance::scaled_unit_names() {
        let unit = registry.lookup(DISTANCE, name)?;
        registry.derive_unit(AREA, &unit, Operator::Square)?;
    }
    registry.define_unit(AREA, "Imperial", |x| x * distance::FOOT * distance::FOOT, |x| {
        x / (distance::FOOT * distance::FOOT)
    })?;

    registry.define_linear(AREA, "hectare", "ha", 10_000.0)?;
    registry.define_linear(AREA, "acre", "ac", 4_046.856_422_4)?;

    // Aliases
    registry.alias(AREA, "square meter", area.base_unit())?;
    registry.alias(AREA, "square meters", area.base_unit())?;
    registry.alias(AREA, "square feet", "square foot")?;
    registry.alias(AREA, "square miles", "square mile")?;
    registry.alias(AREA, "hectares", "hectare")?;
    registry.alias(AREA, "acres", "acre")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::register_distance_units;

    fn registry() -> QuantityRegistry {
        let mut reg = QuantityRegistry::new();
        register_distance_units(&mut reg).unwrap();
        register_area_units(&mut reg).unwrap();
        reg
    }

    #[test]
    fn test_square_units() {
        let reg = registry();
        assert_eq!(reg.lookup(AREA, "km^2").unwrap().to_base(1.0).unwrap(), 1_000_000.0);

        let sq_ft = reg.lookup(AREA, "square feet").unwrap();
        assert!((sq_ft.to_base(1.0).unwrap() - 0.09290304).abs() < 1e-12);
    }

    #[test]
    fn test_hectare_and_acre() {
        let reg = registry();
        assert_eq!(reg.convert(AREA, 1.0, "km^2", "ha").unwrap(), 100.0);

        // 640 acres per square mile
        let acres = reg.convert(AREA, 1.0, "square mile", "acres").unwrap();
        assert!((acres - 640.0).abs() < 1e-9);
    }

    #[test]
    fn test_imperial_area_system() {
        let reg = registry();
        let imperial = reg.convert(AREA, 1.0, "Imperial", "square foot").unwrap();
        assert!((imperial - 1.0).abs() < 1e-12);
    }
}
