//! Temperature: absolute scales with offsets around the kelvin

use mensura_core::{QuantityKind, QuantityRegistry, Result};

pub const TEMPERATURE: &str = "Temperature";
pub const KELVIN: &str = "K";

const FAHRENHEIT_SCALE: f64 = 5.0 / 9.0;

/// Register Temperature as an affine kind. Its units carry offsets, so
/// the kind refuses derivation.
pub fn register_temperature_units(registry: &mut QuantityRegistry) -> Result<()> {
    registry.register_kind(QuantityKind::affine(TEMPERATURE, KELVIN))?;

    registry.define_affine(TEMPERATURE, "celsius", "C", 1.0, 273.15)?;
    registry.define_affine(TEMPERATURE, "fahrenheit", "F", FAHRENHEIT_SCALE, 459.67 * FAHRENHEIT_SCALE)?;
    registry.define_linear(TEMPERATURE, "rankine", "R", FAHRENHEIT_SCALE)?;

    registry.alias(TEMPERATURE, "kelvin", KELVIN)?;
    registry.alias(TEMPERATURE, "degC", "celsius")?;
    registry.alias(TEMPERATURE, "degF", "fahrenheit")?;

    Ok(())
}
