//! Measurement type - a value tagged with a unit

use std::cmp::Ordering;
use std::fmt;
use crate::derive::{derive_unit, Operator};
use crate::kind::KindRef;
use crate::{Error, Quantity, Result, Tolerance};

/// "X units of kind K expressed in unit U".
///
/// Arithmetic and comparison require both operands to share a kind; mixing
/// kinds fails with [`Error::IncompatibleKind`]. Equality and ordering look
/// at the base-unit magnitude, so `1000 m == 1 km`.
#[derive(Debug, Clone)]
pub struct Measurement {
    value: f64,
    unit: Quantity,
}

impl Measurement {
    /// Create a measurement; the value must be finite
    pub fn new(value: f64, unit: Quantity) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidValue(value));
        }
        Ok(Measurement { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Quantity {
        &self.unit
    }

    pub fn kind(&self) -> &KindRef {
        self.unit.kind()
    }

    /// Magnitude expressed in the kind's base unit
    pub fn base_value(&self) -> Result<f64> {
        self.unit.to_base(self.value)
    }

    /// Check if two measurements share a kind
    pub fn is_compatible(&self, other: &Measurement) -> bool {
        self.kind().is_compatible(other.kind())
    }

    /// Express this measurement in another unit of the same kind
    pub fn convert_to(&self, target: &Quantity) -> Result<Measurement> {
        let value = self.unit.convert_to(target, self.value)?;
        Measurement::new(value, target.clone())
    }

    /// Sum in base units, expressed in `self`'s unit
    pub fn add(&self, other: &Measurement) -> Result<Measurement> {
        let (a, b) = self.base_pair(other)?;
        self.in_own_unit(a + b)
    }

    /// Difference in base units, expressed in `self`'s unit
    pub fn sub(&self, other: &Measurement) -> Result<Measurement> {
        let (a, b) = self.base_pair(other)?;
        self.in_own_unit(a - b)
    }

    /// Compare base-unit magnitudes. Magnitudes within the default
    /// tolerance compare as equal.
    pub fn compare(&self, other: &Measurement) -> Result<Ordering> {
        self.compare_within(other, &Tolerance::default())
    }

    pub fn compare_within(&self, other: &Measurement, tolerance: &Tolerance) -> Result<Ordering> {
        let (a, b) = self.base_pair(other)?;
        if tolerance.approx_eq(a, b) {
            return Ok(Ordering::Equal);
        }
        Ok(a.total_cmp(&b))
    }

    /// Equality of base-unit magnitudes under an explicit tolerance
    pub fn approx_eq(&self, other: &Measurement, tolerance: &Tolerance) -> Result<bool> {
        let (a, b) = self.base_pair(other)?;
        Ok(tolerance.approx_eq(a, b))
    }

    /// Multiply by a plain number, keeping the unit
    pub fn scale(&self, factor: f64) -> Result<Measurement> {
        if !factor.is_finite() {
            return Err(Error::InvalidValue(factor));
        }
        Measurement::new(self.value * factor, self.unit.clone())
    }

    /// Product of two measurements, in the derived product unit.
    /// `2 km * 3 km` is `6 km^2`.
    pub fn multiply(&self, other: &Measurement) -> Result<Measurement> {
        let unit = derive_unit(&self.unit, Operator::Product(&other.unit))?;
        Measurement::new(self.value * other.value, unit)
    }

    /// Ratio of two measurements, in the derived ratio unit
    pub fn divide(&self, other: &Measurement) -> Result<Measurement> {
        if other.value == 0.0 {
            return Err(Error::DivisionByZero(other.unit.name().to_string()));
        }
        let unit = derive_unit(&self.unit, Operator::Ratio(&other.unit))?;
        Measurement::new(self.value / other.value, unit)
    }

    fn base_pair(&self, other: &Measurement) -> Result<(f64, f64)> {
        self.kind().ensure_compatible(other.kind())?;
        Ok((self.base_value()?, other.base_value()?))
    }

    fn in_own_unit(&self, base_value: f64) -> Result<Measurement> {
        if !base_value.is_finite() {
            return Err(Error::NonFiniteResult(self.unit.name().to_string()));
        }
        let value = self.unit.from_base(base_value)?;
        Measurement::new(value, self.unit.clone())
    }
}

impl PartialEq for Measurement {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, &Tolerance::default()).unwrap_or(false)
    }
}

impl PartialOrd for Measurement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::{ConversionFunctionPair, QuantityKind, UnitDefinition};

    fn distance() -> KindRef {
        Arc::new(QuantityKind::new("Distance", "m"))
    }

    fn linear(kind: &KindRef, name: &str, symbol: &str, factor: f64) -> Quantity {
        let def = UnitDefinition::new(name, symbol, ConversionFunctionPair::linear(factor).unwrap());
        Quantity::with_definition(kind.clone(), def).unwrap()
    }

    fn meter() -> Quantity {
        Quantity::base(distance())
    }

    fn kilometer() -> Quantity {
        linear(&distance(), "kilometer", "km", 1000.0)
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(Measurement::new(f64::NAN, meter()), Err(Error::InvalidValue(_))));
        assert!(meter().measure(f64::INFINITY).is_err());
    }

    #[test]
    fn test_equality_under_unit_change() {
        let a = meter().measure(1000.0).unwrap();
        let b = kilometer().measure(1.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.compare(&b).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_add_in_first_unit() {
        let a = kilometer().measure(1.0).unwrap();
        let b = meter().measure(500.0).unwrap();
        let sum = a.add(&b).unwrap();

        // 1 km + 500 m = 1.5 km
        assert_eq!(sum.value(), 1.5);
        assert_eq!(sum.unit().symbol(), "km");
    }

    #[test]
    fn test_sub() {
        let a = meter().measure(1500.0).unwrap();
        let b = kilometer().measure(1.0).unwrap();
        assert_eq!(a.sub(&b).unwrap().value(), 500.0);
    }

    #[test]
    fn test_compare() {
        let a = meter().measure(999.0).unwrap();
        let b = kilometer().measure(1.0).unwrap();
        assert_eq!(a.compare(&b).unwrap(), Ordering::Less);
        assert!(b > a);
    }

    #[test]
    fn test_cross_kind_rejected() {
        let length = kilometer().measure(1.0).unwrap();
        let area = length.multiply(&length).unwrap();

        assert!(matches!(length.add(&area), Err(Error::IncompatibleKind { .. })));
        assert!(matches!(length.compare(&area), Err(Error::IncompatibleKind { .. })));
        assert_ne!(length, area);
        assert_eq!(length.partial_cmp(&area), None);
    }

    #[test]
    fn test_multiply() {
        let a = kilometer().measure(2.0).unwrap();
        let b = kilometer().measure(3.0).unwrap();
        let area = a.multiply(&b).unwrap();

        assert_eq!(area.value(), 6.0);
        assert_eq!(area.unit().symbol(), "km^2");
        assert_eq!(area.base_value().unwrap(), 6_000_000.0);
        assert_eq!(area.kind().base_unit(), "m^2");
    }

    #[test]
    fn test_multiply_mixed_units() {
        let a = kilometer().measure(2.0).unwrap();
        let b = meter().measure(3.0).unwrap();
        let area = a.multiply(&b).unwrap();

        assert_eq!(area.base_value().unwrap(), 6000.0);
        let sq_m = Quantity::base(area.kind().clone());
        assert_eq!(area.convert_to(&sq_m).unwrap().value(), 6000.0);
    }

    #[test]
    fn test_divide_same_kind_is_dimensionless() {
        let a = kilometer().measure(3.0).unwrap();
        let b = meter().measure(1500.0).unwrap();
        let ratio = a.divide(&b).unwrap();
        assert!(ratio.kind().dimension().is_dimensionless());
        assert!((ratio.base_value().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_divide_by_zero() {
        let a = kilometer().measure(3.0).unwrap();
        let zero = meter().measure(0.0).unwrap();
        assert_eq!(a.divide(&zero).unwrap_err(), Error::DivisionByZero("m".to_string()));
    }

    #[test]
    fn test_product_order_does_not_matter() {
        let len = meter().measure(2.0).unwrap();
        let area = len.multiply(&len).unwrap();

        let left = len.multiply(&area).unwrap();
        let right = area.multiply(&len).unwrap();
        assert!(left.is_compatible(&right));
        assert_eq!(left.kind().base_unit(), "m^3");
        assert_eq!(left.add(&right).unwrap().base_value().unwrap(), 16.0);
    }

    #[test]
    fn test_ratio_cancels_back_to_component() {
        let len = meter().measure(2.0).unwrap();
        let km = kilometer().measure(0.5).unwrap();
        let area = len.multiply(&km).unwrap();

        let back = area.divide(&km).unwrap();
        assert!(back.is_compatible(&len));
        assert_eq!(back.kind().base_unit(), "m");
        assert!((back.add(&len).unwrap().base_value().unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale() {
        let a = kilometer().measure(2.0).unwrap();
        assert_eq!(a.scale(2.5).unwrap().value(), 5.0);
        assert!(a.scale(f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        let a = kilometer().measure(2.5).unwrap();
        assert_eq!(a.to_string(), "2.5 km");
    }
}
