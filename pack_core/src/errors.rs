//! # Error Types
//!
//! Structured error types for pack_core. Every failure the engine can report
//! is a local, recoverable condition: the caller (a UI, the CLI, an external
//! assistant) decides whether to re-prompt for input.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::errors::{SimError, SimResult};
//!
//! fn validate_height(height_m: f64) -> SimResult<()> {
//!     if height_m <= 0.0 {
//!         return Err(SimError::invalid_parameter(
//!             "height_m",
//!             height_m.to_string(),
//!             "Drop height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pack_core operations
pub type SimResult<T> = Result<T, SimError>;

/// Structured error type for simulation and pipeline operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SimError {
    /// Material key not present in the catalog
    #[error("Unknown material: {material_key}")]
    UnknownMaterial { material_key: String },

    /// Test type text did not name a supported scenario
    #[error("Unknown test type: {test_type}")]
    UnknownTestType { test_type: String },

    /// A physical parameter is out of range (non-positive height, g-force, ...)
    #[error("Invalid parameter '{field}': {value} - {reason}")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    /// The pipeline was asked to run with nothing configured
    #[error("No tests selected: at least one test must be configured")]
    NoTestsSelected,

    /// Aggregation or recommendation requested before any results exist
    #[error("No results available: run the configured tests first")]
    NoResults,

    /// Workflow step change that the state machine does not allow
    #[error("Invalid transition from {from}: {reason}")]
    InvalidTransition { from: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
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

impl SimError {
    /// Create an UnknownMaterial error
    pub fn unknown_material(material_key: impl Into<String>) -> Self {
        SimError::UnknownMaterial {
            material_key: material_key.into(),
        }
    }

    /// Create an UnknownTestType error
    pub fn unknown_test_type(test_type: impl Into<String>) -> Self {
        SimError::UnknownTestType {
            test_type: test_type.into(),
        }
    }

    /// Create an InvalidParameter error
    pub fn invalid_parameter(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SimError::InvalidParameter {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(from: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidTransition {
            from: from.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SimError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this by changing its input and retrying
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SimError::UnknownMaterial { .. }
                | SimError::UnknownTestType { .. }
                | SimError::InvalidParameter { .. }
                | SimError::NoTestsSelected
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SimError::UnknownMaterial { .. } => "UNKNOWN_MATERIAL",
            SimError::UnknownTestType { .. } => "UNKNOWN_TEST_TYPE",
            SimError::InvalidParameter { .. } => "INVALID_PARAMETER",
            SimError::NoTestsSelected => "NO_TESTS_SELECTED",
            SimError::NoResults => "NO_RESULTS",
            SimError::InvalidTransition { .. } => "INVALID_TRANSITION",
            SimError::FileError { .. } => "FILE_ERROR",
            SimError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SimError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
