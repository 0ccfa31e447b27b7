//! Generation errors.

use rackforge_spec::{SchemaError, ValidationError};
use thiserror::Error;

/// Errors from a generation backend.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The request failed validation.
    #[error("generation request is invalid ({} error(s))", .0.len())]
    InvalidRequest(Vec<ValidationError>),

    /// The validator itself could not run.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The backend failed while generating.
    #[error("backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },

    /// The backend did not finish in time.
    #[error("generation timed out after {after_ms} ms")]
    TimedOut { after_ms: u64 },
}

impl GenerateError {
    /// Stable code for reporting (e.g., "GEN_001").
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::InvalidRequest(_) => "GEN_001",
            GenerateError::Schema(_) => "GEN_002",
            GenerateError::Backend { .. } => "GEN_003",
            GenerateError::TimedOut { .. } => "GEN_004",
        }
    }
}
