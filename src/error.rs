//! Error types for the annotation pipeline.
//!
//! None of these ever reach the host build: `VisualTransformer::transform` logs them
//! and resolves to `TransformOutcome::NoChange`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// The module could not be parsed as TSX.
    #[error("failed to parse {id}: {message}")]
    Parse {
        id: String,
        message: String,
        /// Every parser diagnostic, debug-formatted. Surfaced in verbose mode only.
        details: Vec<String>,
    },

    /// Any other failure during traversal or regeneration.
    #[error("unexpected failure while transforming {id}: {message}")]
    Unexpected { id: String, message: String },
}

impl TransformError {
    pub fn id(&self) -> &str {
        match self {
            TransformError::Parse { id, .. } | TransformError::Unexpected { id, .. } => id,
        }
    }

    /// Full diagnostic trace for verbose logging.
    pub fn details(&self) -> &[String] {
        match self {
            TransformError::Parse { details, .. } => details,
            TransformError::Unexpected { .. } => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid plugin options: {0}")]
    Json(#[from] serde_json::Error),
}
