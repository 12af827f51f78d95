//! Error taxonomy for artifact loading and prediction
//!
//! Unseen categorical labels are deliberately absent here: they are encoded
//! as [`crate::encoder::UNKNOWN_CATEGORY`] and never surface as failures.

use thiserror::Error;

/// Failures raised while loading a model artifact. Both variants are fatal
/// to startup and are not retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArtifactError {
    /// The artifact source could not be read
    #[error("artifact not found at {path}: {reason}")]
    NotFound { path: String, reason: String },

    /// A required entry is missing or has the wrong shape
    #[error("corrupt artifact: entry '{entry}' {reason}")]
    Corrupt { entry: String, reason: String },
}

impl ArtifactError {
    pub fn not_found(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::NotFound {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn corrupt(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind used in logs and health messages
    pub fn kind(&self) -> &'static str {
        match self {
            ArtifactError::NotFound { .. } => "artifact_not_found",
            ArtifactError::Corrupt { .. } => "corrupt_artifact",
        }
    }
}

/// Failures raised by a regressor on a single input vector
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegressorError {
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature {index} is not finite ({value})")]
    NonFiniteInput { index: usize, value: f64 },

    #[error("regressor produced a non-finite output ({0})")]
    NonFiniteOutput(f64),

    #[error("tree {tree} is malformed at node {node}")]
    MalformedTree { tree: usize, node: usize },
}

/// Per-request prediction failure. Recoverable: the artifact and other
/// requests are unaffected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictionError {
    #[error("prediction failed: {0}")]
    Failed(#[from] RegressorError),
}

/// A single request field outside the accepted input range
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{field}: {message}")]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Boundary validation failure listing every violated field
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid prediction request: {}", .violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}
