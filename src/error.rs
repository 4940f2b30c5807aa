//! Error types for Mobility Insight
//!
//! Only payload-level failures are errors. Missing streams and malformed
//! records are absorbed by the normalizer and never reach this type.

use thiserror::Error;

/// Errors surfaced to the caller of the view-model pipeline
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Malformed analysis payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}
