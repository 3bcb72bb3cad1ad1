//! Errors raised by the conversion engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the engine reports. All of them are recoverable and are
/// returned to the caller; nothing is coerced to a default value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("kind '{kind}' is already registered with base unit '{existing}', not '{requested}'")]
    DuplicateKind {
        kind: String,
        existing: String,
        requested: String,
    },

    #[error("unknown quantity kind '{0}'")]
    UnknownKind(String),

    #[error("unit '{unit}' not found for kind '{kind}'")]
    UnitNotFound { kind: String, unit: String },

    #[error("unit '{unit}' is already defined for kind '{kind}'")]
    DuplicateUnit { kind: String, unit: String },

    #[error("incompatible kinds: '{from}' vs '{to}'")]
    IncompatibleKind { from: String, to: String },

    #[error("unit '{0}' is not a pure linear scale and cannot be derived")]
    NonLinearDerivation(String),

    #[error("unit '{unit}' is not a pure scale of the base unit; kind '{kind}' only accepts linear units")]
    NonLinearUnit { kind: String, unit: String },

    #[error("invalid value {0}: conversion input must be finite")]
    InvalidValue(f64),

    #[error("division by a zero measurement in '{0}'")]
    DivisionByZero(String),

    #[error("converting through unit '{0}' produced a non-finite result")]
    NonFiniteResult(String),
}

impl Error {
    pub(crate) fn incompatible(from: impl Into<String>, to: impl Into<String>) -> Self {
        Error::IncompatibleKind {
            from: from.into(),
            to: to.into(),
        }
    }
}
