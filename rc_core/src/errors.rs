//! # Error Types
//!
//! Structured error types for rc_core. Every failure carries enough context
//! to tell which input was wrong and why, both for people reading a report
//! and for programs consuming the JSON form.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_cm: f64) -> CalcResult<()> {
//!     if width_cm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "width_cm",
//!             width_cm.to_string(),
//!             "Section width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(-40.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for rc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive, out of range, degenerate)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Bar designation is not in the CNS 560 catalog
    #[error("Unknown bar size: '{designation}' (expected one of D10, D13, D16, D19, D22, D25, D29, D32, D36, D43)")]
    UnknownBarSize { designation: String },

    /// Neutral-axis search found no sign change in net axial force
    #[error(
        "Neutral axis solver did not converge after {steps} steps \
         (last depth {last_depth_cm:.3} cm, net force {last_net_force_kgf:.1} kgf)"
    )]
    SolverDidNotConverge {
        steps: usize,
        last_depth_cm: f64,
        last_net_force_kgf: f64,
    },

    /// Calculation failed for a reason other than bad input
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error (settings file, report output)
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (report compilation and the like)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownBarSize error
    pub fn unknown_bar_size(designation: impl Into<String>) -> Self {
        CalcError::UnknownBarSize {
            designation: designation.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownBarSize { .. } => "UNKNOWN_BAR_SIZE",
            CalcError::SolverDidNotConverge { .. } => "SOLVER_DID_NOT_CONVERGE",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be positive and finite",
        ));
    }
    Ok(())
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be non-negative and finite",
        ));
    }
    Ok(())
}
