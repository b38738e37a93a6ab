//! Error types for autoencoder operations.

use thiserror::Error;

/// Result type alias for autoencoder operations.
pub type Result<T> = std::result::Result<T, AutoencoderError>;

/// Errors that can occur while building, training, running or
/// (de)serializing an autoencoder.
#[derive(Debug, Error)]
pub enum AutoencoderError {
    /// A vector did not match the size of the layer it was fed to.
    #[error("size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Caller supplied data that cannot be used, e.g. an empty data set.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Layer sizes do not describe a usable network.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The engine was asked to run before `initialize`, `train` or
    /// `from_json` gave it any weights.
    #[error("network has not been initialized")]
    Uninitialized,

    /// A serialized model is missing keys or is otherwise malformed.
    #[error("invalid model format: {0}")]
    Format(String),

    /// JSON could not be parsed or produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AutoencoderError {
    pub(crate) fn size_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        AutoencoderError::SizeMismatch {
            what,
            expected,
            actual,
        }
    }

    pub(crate) fn format(reason: impl Into<String>) -> Self {
        AutoencoderError::Format(reason.into())
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        AutoencoderError::InvalidInput(reason.into())
    }
}
