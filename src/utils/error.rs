use std::io;

use thiserror::Error;

/// Boxed error returned by external collaborators such as the language model.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FormError {
    /// Every attempt allowed by the retry policy failed.
    #[error("Failed to extract fields after {attempts} attempt(s): {cause}")]
    ExtractionFailed { attempts: u32, cause: String },
    #[error("Model call error: {0}")]
    ModelCall(String),
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
