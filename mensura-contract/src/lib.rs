//! Mensura Contract - laws every unit must satisfy
//!
//! Any new kind or unit system can be checked against the same contract:
//!
//! - round trip: `from_base(to_base(x)) == x`
//! - base identity: the kind's base unit converts as the identity
//! - transitivity: `a -> c == (a -> b) -> c` for any three units of a kind
//! - expected magnitudes: `to_base(input) == expected` for literal cases
//!
//! Checks run over a fixed table of sample values and over values drawn
//! by quickcheck. [`ConversionContract::check_registry`] runs all of them
//! over every unit of every registered kind.

use quickcheck::{Arbitrary, Gen};
use thiserror::Error;
use tracing::debug;
use mensura_core::{Quantity, QuantityRegistry, Tolerance};

/// Sample inputs used by the table-driven checks
pub const DEFAULT_SAMPLES: [f64; 10] = [
    0.0, 1.0, -1.0, 0.3048, 2.5, 42.0, 1.0e-6, 1234.5678, -98765.4321, 1.0e9,
];

/// Drawn values are folded into `(-LIMIT, LIMIT)` so that scale factors
/// cannot push them past the f64 range.
const QUICKCHECK_LIMIT: f64 = 1.0e12;

/// A broken conversion law
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("{unit}: from_base(to_base({input})) = {actual}")]
    RoundTrip { unit: String, input: f64, actual: f64 },

    #[error("{unit}: base unit is not the identity at {input} (got {actual})")]
    BaseIdentity { unit: String, input: f64, actual: f64 },

    #[error("{from} -> {via} -> {to} at {input}: direct {direct}, composed {composed}")]
    Transitivity {
        from: String,
        via: String,
        to: String,
        input: f64,
        direct: f64,
        composed: f64,
    },

    #[error("{unit}: to_base({input}) = {actual}, expected {expected}")]
    Expected {
        unit: String,
        input: f64,
        expected: f64,
        actual: f64,
    },

    #[error("{unit}: conversion of {input} failed: {source}")]
    Conversion {
        unit: String,
        input: f64,
        #[source]
        source: mensura_core::Error,
    },
}

pub type Outcome = std::result::Result<(), Violation>;

/// Configured set of conversion checks
#[derive(Debug, Clone)]
pub struct ConversionContract {
    tolerance: Tolerance,
    samples: Vec<f64>,
}

impl Default for ConversionContract {
    fn default() -> Self {
        ConversionContract {
            tolerance: Tolerance::default(),
            samples: DEFAULT_SAMPLES.to_vec(),
        }
    }
}

impl ConversionContract {
    pub fn new(tolerance: Tolerance) -> Self {
        ConversionContract {
            tolerance,
            ..Self::default()
        }
    }

    pub fn with_samples(mut self, samples: &[f64]) -> Self {
        self.samples = samples.to_vec();
        self
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// `from_base(to_base(x)) == x` for every sample
    pub fn round_trip(&self, unit: &Quantity) -> Outcome {
        self.samples.iter().try_for_each(|&x| self.round_trip_at(unit, x))
    }

    pub fn round_trip_at(&self, unit: &Quantity, input: f64) -> Outcome {
        let base = convert(unit, input, |u, v| u.to_base(v))?;
        let actual = convert(unit, base, |u, v| u.from_base(v))?;
        if self.tolerance.approx_eq(actual, input) {
            Ok(())
        } else {
            Err(Violation::RoundTrip {
                unit: unit.name().to_string(),
                input,
                actual,
            })
        }
    }

    /// The base unit's conversions are exactly the identity
    pub fn base_identity(&self, unit: &Quantity) -> Outcome {
        for &x in &self.samples {
            let to = convert(unit, x, |u, v| u.to_base(v))?;
            let from = convert(unit, x, |u, v| u.from_base(v))?;
            for actual in [to, from] {
                if actual != x {
                    return Err(Violation::BaseIdentity {
                        unit: unit.name().to_string(),
                        input: x,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// Converting `from -> to` directly matches going through `via`
    pub fn transitivity(&self, from: &Quantity, via: &Quantity, to: &Quantity) -> Outcome {
        for &x in &self.samples {
            let direct = convert(from, x, |u, v| u.convert_to(to, v))?;
            let hop = convert(from, x, |u, v| u.convert_to(via, v))?;
            let composed = convert(via, hop, |u, v| u.convert_to(to, v))?;
            if !self.tolerance.approx_eq(direct, composed) {
                return Err(Violation::Transitivity {
                    from: from.name().to_string(),
                    via: via.name().to_string(),
                    to: to.name().to_string(),
                    input: x,
                    direct,
                    composed,
                });
            }
        }
        Ok(())
    }

    /// `to_base(input)` matches the expected base magnitude for each case
    pub fn expected(&self, unit: &Quantity, cases: &[(f64, f64)]) -> Outcome {
        for &(input, expected) in cases {
            let actual = convert(unit, input, |u, v| u.to_base(v))?;
            if !self.tolerance.approx_eq(actual, expected) {
                return Err(Violation::Expected {
                    unit: unit.name().to_string(),
                    input,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Round trip over `tests` values drawn by quickcheck
    pub fn quickcheck_round_trip(&self, unit: &Quantity, tests: usize) -> Outcome {
        let mut gen = Gen::new(100);
        for _ in 0..tests {
            let x = f64::arbitrary(&mut gen);
            if !x.is_finite() {
                continue;
            }
            self.round_trip_at(unit, x % QUICKCHECK_LIMIT)?;
        }
        Ok(())
    }

    /// Every law over a set of units of one kind. Units named after their
    /// kind's base unit are also held to the identity law.
    pub fn check_units(&self, units: &[Quantity]) -> Vec<Violation> {
        let mut violations = Vec::new();

        for unit in units {
            violations.extend(self.round_trip(unit).err());
            if unit.name() == unit.kind().base_unit() {
                violations.extend(self.base_identity(unit).err());
            }
        }

        for a in units {
            for b in units {
                for c in units {
                    violations.extend(self.transitivity(a, b, c).err());
                }
            }
        }

        violations
    }

    /// Every law over every unit of every registered kind
    pub fn check_registry(&self, registry: &QuantityRegistry) -> Vec<Violation> {
        let mut violations = Vec::new();
        for kind in registry.kinds() {
            match registry.units(kind.name()) {
                Ok(units) => {
                    debug!(kind = kind.name(), units = units.len(), "checking conversion contract");
                    violations.extend(self.check_units(&units));
                }
                Err(source) => violations.push(Violation::Conversion {
                    unit: kind.base_unit().to_string(),
                    input: 0.0,
                    source,
                }),
            }
        }
        violations
    }

    /// Panic with every violation found in the registry
    pub fn assert_registry(&self, registry: &QuantityRegistry) {
        let violations = self.check_registry(registry);
        if !violations.is_empty() {
            let report: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            panic!("conversion contract violated:\n  {}", report.join("\n  "));
        }
    }
}

fn convert(
    unit: &Quantity,
    input: f64,
    f: impl FnOnce(&Quantity, f64) -> mensura_core::Result<f64>,
) -> std::result::Result<f64, Violation> {
    f(unit, input).map_err(|source| Violation::Conversion {
        unit: unit.name().to_string(),
        input,
        source,
    })
}
