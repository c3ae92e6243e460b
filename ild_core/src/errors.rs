//! # Error Types
//!
//! Structured error types for ild_core. Every failure carries the offending
//! values so a front end can tell the user exactly what to correct before an
//! analysis is attempted.
//!
//! ## Example
//!
//! ```rust
//! use ild_core::errors::{CalcError, CalcResult};
//!
//! fn check_span(span_m: f64) -> CalcResult<()> {
//!     if !(span_m > 0.0) {
//!         return Err(CalcError::InvalidGeometry { span_m });
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(check_span(-1.0).unwrap_err().error_code(), "INVALID_GEOMETRY");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for ild_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for analysis and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Beam span is zero, negative or not a finite number
    #[error("Invalid geometry: span {span_m} m must be a positive finite length")]
    InvalidGeometry { span_m: f64 },

    /// Load spacing is negative or longer than the span
    #[error("Invalid spacing: {spacing_m} m must lie within 0..={span_m} m")]
    InvalidSpacing { spacing_m: f64, span_m: f64 },

    /// Lead load position handed to a single-point evaluator is off the span
    #[error("Load position {position_m} m is outside the span 0..={span_m} m")]
    OutOfRangeLoadPosition { position_m: f64, span_m: f64 },

    /// Section coordinate is off the span
    #[error("Section {section_m} m is outside the span 0..={span_m} m")]
    OutOfRangeSection { section_m: f64, span_m: f64 },

    /// Any other input value is invalid (negative load, zero resolution, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// True for errors caused by the analysis inputs rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidGeometry { .. }
                | CalcError::InvalidSpacing { .. }
                | CalcError::OutOfRangeLoadPosition { .. }
                | CalcError::OutOfRangeSection { .. }
                | CalcError::InvalidInput { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::InvalidSpacing { .. } => "INVALID_SPACING",
            CalcError::OutOfRangeLoadPosition { .. } => "OUT_OF_RANGE_LOAD_POSITION",
            CalcError::OutOfRangeSection { .. } => "OUT_OF_RANGE_SECTION",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
