//! Conversion function pairs relating a unit to its kind's base unit

use std::fmt;
use std::sync::Arc;
use crate::{Error, Result, Tolerance};

type ConversionFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Sample points used to check that an opaque conversion is proportional
const LINEARITY_PROBES: [f64; 4] = [-2.5, 0.5, 10.0, 1.0e3];

/// What is known about the shape of a conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversionForm {
    /// `base = value * factor`
    Linear { factor: f64 },
    /// `base = value * factor + offset`
    Affine { factor: f64, offset: f64 },
    /// Caller-supplied closures; the shape is unknown
    Opaque,
}

/// The `(to_base, from_base)` pair that defines a unit.
///
/// The pair must satisfy `from_base(to_base(x)) == x` within tolerance.
/// Cloning is cheap: the closures are shared.
#[derive(Clone)]
pub struct ConversionFunctionPair {
    to_base: ConversionFn,
    from_base: ConversionFn,
    form: ConversionForm,
}

impl ConversionFunctionPair {
    /// Wrap two caller-supplied functions
    pub fn new<T, F>(to_base: T, from_base: F) -> Self
    where
        T: Fn(f64) -> f64 + Send + Sync + 'static,
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        ConversionFunctionPair {
            to_base: Arc::new(to_base),
            from_base: Arc::new(from_base),
            form: ConversionForm::Opaque,
        }
    }

    /// The base unit's own conversion
    pub fn identity() -> Self {
        ConversionFunctionPair {
            to_base: Arc::new(|x| x),
            from_base: Arc::new(|x| x),
            form: ConversionForm::Linear { factor: 1.0 },
        }
    }

    /// Pure scale: `base = value * factor`
    pub fn linear(factor: f64) -> Result<Self> {
        check_factor(factor)?;
        Ok(ConversionFunctionPair {
            to_base: Arc::new(move |x| x * factor),
            from_base: Arc::new(move |x| x / factor),
            form: ConversionForm::Linear { factor },
        })
    }

    /// Scale plus offset: `base = value * factor + offset`
    pub fn affine(factor: f64, offset: f64) -> Result<Self> {
        check_factor(factor)?;
        if !offset.is_finite() {
            return Err(Error::InvalidValue(offset));
        }
        if offset == 0.0 {
            return Self::linear(factor);
        }
        Ok(ConversionFunctionPair {
            to_base: Arc::new(move |x| x * factor + offset),
            from_base: Arc::new(move |x| (x - offset) / factor),
            form: ConversionForm::Affine { factor, offset },
        })
    }

    pub fn form(&self) -> ConversionForm {
        self.form
    }

    /// Apply `to_base` without validation
    pub fn to_base(&self, value: f64) -> f64 {
        (self.to_base)(value)
    }

    /// Apply `from_base` without validation
    pub fn from_base(&self, base_value: f64) -> f64 {
        (self.from_base)(base_value)
    }

    /// True for the identity conversion
    pub fn is_identity(&self) -> bool {
        match self.form {
            ConversionForm::Linear { factor } => factor == 1.0,
            ConversionForm::Affine { .. } => false,
            ConversionForm::Opaque => self.linear_factor() == Some(1.0),
        }
    }

    /// True when the conversion moves zero away from zero
    pub fn has_offset(&self) -> bool {
        match self.form {
            ConversionForm::Linear { .. } => false,
            ConversionForm::Affine { offset, .. } => offset != 0.0,
            ConversionForm::Opaque => !Tolerance::DEFAULT.approx_eq(self.to_base(0.0), 0.0),
        }
    }

    /// The scale factor when the conversion is a pure linear scale.
    ///
    /// Opaque pairs are probed at a few sample points; a conversion that is
    /// not proportional at every probe yields `None`.
    pub fn linear_factor(&self) -> Option<f64> {
        match self.form {
            ConversionForm::Linear { factor } => Some(factor),
            ConversionForm::Affine { .. } => None,
            ConversionForm::Opaque => {
                let factor = self.to_base(1.0);
                if !factor.is_finite() || factor == 0.0 || self.has_offset() {
                    return None;
                }
                let proportional = LINEARITY_PROBES
                    .iter()
                    .all(|&x| Tolerance::DEFAULT.approx_eq(self.to_base(x), x * factor));
                proportional.then_some(factor)
            }
        }
    }
}

fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor != 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidValue(factor))
    }
}

impl fmt::Debug for ConversionFunctionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionFunctionPair")
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}
