//! Error types for funnel calculations.
//!
//! Validation failures are rejected at the boundary before any computation
//! begins; nothing in the engine fails mid-calculation. Unreachable
//! quantities (a reverse solve through a zero rate) are represented as data
//! via [`crate::core::StageValue::NotComputable`], not as errors, and a
//! missing benchmark row falls back to the default industry rather than
//! failing. This enum therefore only covers bad inputs and the CLI's I/O.

use thiserror::Error;

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, FunnelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunnelError {
    /// A numeric input failed validation (non-positive, non-finite, or a
    /// rate outside [0, 1])
    #[error("invalid input for {field}: {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The authoritative input for the chosen direction was not supplied
    #[error("missing {field}: required for a {direction} calculation")]
    MissingInput {
        field: &'static str,
        direction: &'static str,
    },

    /// Malformed scenario or config data supplied to the CLI
    #[error("parse error: {0}")]
    Parse(String),
}

impl FunnelError {
    /// Invalid numeric input with the offending value and a short reason.
    pub fn invalid_input(field: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason,
        }
    }

    pub fn missing_input(field: &'static str, direction: &'static str) -> Self {
        Self::MissingInput { field, direction }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Require a strictly positive, finite value.
pub fn validate_positive(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(FunnelError::invalid_input(field, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(FunnelError::invalid_input(
            field,
            value,
            "must be greater than zero",
        ));
    }
    Ok(value)
}

/// Require a conversion probability in [0, 1]. Zero is allowed; the solver
/// has an explicit policy for it.
pub fn validate_rate(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(FunnelError::invalid_input(field, value, "must be finite"));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(FunnelError::invalid_input(
            field,
            value,
            "must be a probability in [0, 1]",
        ));
    }
    Ok(value)
}
