//! Distance: metric and imperial units around the meter

use mensura_core::{QuantityRegistry, Result};

pub const DISTANCE: &str = "Distance";
pub const METER: &str = "m";

/// Meters per foot
pub const FOOT: f64 = 0.3048;

/// Metric units (name, symbol, meters per unit)
const METRIC: [(&str, &str, f64); 3] = [
    ("millimeter", "mm", 0.001),
    ("centimeter", "cm", 0.01),
    ("kilometer", "km", 1000.0),
];

/// Imperial/US units (name, symbol, meters per unit)
const IMPERIAL: [(&str, &str, f64); 5] = [
    ("inch", "in", 0.0254),
    ("foot", "ft", FOOT),
    ("yard", "yd", 0.9144),
    ("mile", "mi", 1609.344),
    ("nautical mile", "nmi", 1852.0),
];

/// Register Distance with the meter as base unit, its metric and imperial
/// units, and the two whole unit systems: "Metric" (already in meters)
/// and "Imperial" (feet).
pub fn register_distance_units(registry: &mut QuantityRegistry) -> Result<()> {
    registry.register(DISTANCE, METER)?;

    for (name, symbol, factor) in METRIC.iter().chain(IMPERIAL.iter()) {
        registry.define_linear(DISTANCE, name, symbol, *factor)?;
    }

    registry.define_unit(DISTANCE, "Metric", |x| x, |x| x)?;
    registry.define_unit(DISTANCE, "Imperial", |x| x * FOOT, |x| x / FOOT)?;

    // Aliases
    registry.alias(DISTANCE, "meter", METER)?;
    registry.alias(DISTANCE, "meters", METER)?;
    registry.alias(DISTANCE, "metre", METER)?;
    registry.alias(DISTANCE, "metres", METER)?;
    registry.alias(DISTANCE, "kilometers", "kilometer")?;
    registry.alias(DISTANCE, "kilometres", "kilometer")?;
    registry.alias(DISTANCE, "centimeters", "centimeter")?;
    registry.alias(DISTANCE, "millimeters", "millimeter")?;
    registry.alias(DISTANCE, "inches", "inch")?;
    registry.alias(DISTANCE, "feet", "foot")?;
    registry.alias(DISTANCE, "yards", "yard")?;
    registry.alias(DISTANCE, "miles", "mile")?;

    Ok(())
}

/// Names of the non-base distance units, in definition order
pub(crate) fn scaled_unit_names() -> impl Iterator<Item = &'static str> {
    METRIC.iter().chain(IMPERIAL.iter()).map(|(name, _, _)| *name)
}
