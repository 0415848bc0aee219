//! Facade error types
//!
//! Error codes:
//! - TRACK_CONFIGURATION_CONFLICT (normalize stage)
//! - TRACK_SCHEMA_VIOLATION (validate stage)
//! - TRACK_REFERENTIAL_VIOLATION (reference stage)
//!
//! None of these are retryable: certification is deterministic.

use std::fmt;
use thiserror::Error;

use crate::normalize::NormalizeError;
use crate::reference::ReferenceError;
use crate::schema::SchemaViolation;

/// Pipeline stage that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Validate,
    Reference,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::Validate => "validate",
            Stage::Reference => "reference",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ConfigurationConflict,
    SchemaViolation,
    ReferentialViolation,
}

impl ErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationConflict => "TRACK_CONFIGURATION_CONFLICT",
            ErrorCode::SchemaViolation => "TRACK_SCHEMA_VIOLATION",
            ErrorCode::ReferentialViolation => "TRACK_REFERENTIAL_VIOLATION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// First failure of a facade operation, tagged with its stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("normalize: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("validate: {0}")]
    Validate(#[from] SchemaViolation),

    #[error("reference: {0}")]
    Reference(#[from] ReferenceError),
}

impl ModelError {
    pub fn stage(&self) -> Stage {
        match self {
            ModelError::Normalize(_) => Stage::Normalize,
            ModelError::Validate(_) => Stage::Validate,
            ModelError::Reference(_) => Stage::Reference,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ModelError::Normalize(_) => ErrorCode::ConfigurationConflict,
            ModelError::Validate(_) => ErrorCode::SchemaViolation,
            ModelError::Reference(_) => ErrorCode::ReferentialViolation,
        }
    }
}

/// Result type for facade operations
pub type ModelResult<T> = Result<T, ModelError>;
