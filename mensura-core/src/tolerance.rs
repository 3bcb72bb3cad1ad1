//! Floating-point comparison tolerance

use serde::{Serialize, Deserialize};

/// Tolerance used when comparing converted magnitudes.
///
/// Two values are considered equal when their difference is within
/// `absolute`, or within `relative` times the larger magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub relative: f64,
    pub absolute: f64,
}

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance {
        relative: 1e-9,
        absolute: 1e-12,
    };

    pub fn new(relative: f64, absolute: f64) -> Self {
        Tolerance { relative, absolute }
    }

    /// Relative-only tolerance
    pub fn relative(relative: f64) -> Self {
        Tolerance { relative, absolute: 0.0 }
    }

    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let diff = (a - b).abs();
        diff <= self.absolute || diff <= self.relative * a.abs().max(b.abs())
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        assert!(Tolerance::default().approx_eq(0.3048, 0.3048));
    }

    #[test]
    fn test_relative() {
        let tol = Tolerance::default();
        assert!(tol.approx_eq(1609.344, 1609.344 * (1.0 + 1e-12)));
        assert!(!tol.approx_eq(1609.344, 1609.345));
    }

    #[test]
    fn test_absolute_near_zero() {
        let tol = Tolerance::default();
        assert!(tol.approx_eq(0.0, 1e-13));
        assert!(!Tolerance::relative(1e-9).approx_eq(0.0, 1e-13));
    }

    #[test]
    fn test_deserialize_partial() {
        let tol: Tolerance = serde_json::from_str(r#"{"relative": 1e-6}"#).unwrap();
        assert_eq!(tol.relative, 1e-6);
        assert_eq!(tol.absolute, 1e-12);
    }
}
