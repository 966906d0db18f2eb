//! Engine input validation errors.
//!
//! The engine surfaces exactly one error kind: an argument that is
//! non-finite or outside its numeric domain. Absence of an opportunity
//! (no arbitrage, no Kelly edge) is a value, never an error.

use thiserror::Error;

/// Errors returned by the pricing models when an input violates its domain.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// A numeric argument was non-finite or out of range.
    #[error("invalid input `{field}`: {reason} (got {value})")]
    InvalidInput {
        /// Name of the offending argument.
        field: &'static str,
        /// The value that was provided.
        value: f64,
        /// Which constraint was violated.
        reason: &'static str,
    },
}

impl EngineError {
    pub(crate) const fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason,
        }
    }
}

/// Rejects non-finite values.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid(field, value, "must be finite"))
    }
}

/// Rejects non-finite and negative values. Zero is allowed.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, EngineError> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(EngineError::invalid(field, value, "must not be negative"));
    }
    Ok(value)
}

/// Rejects decimal odds that are non-finite or not strictly above 1.0.
pub(crate) fn ensure_decimal_odds(field: &'static str, value: f64) -> Result<f64, EngineError> {
    let value = ensure_finite(field, value)?;
    if value <= 1.0 {
        return Err(EngineError::invalid(field, value, "decimal odds must exceed 1.0"));
    }
    Ok(value)
}
