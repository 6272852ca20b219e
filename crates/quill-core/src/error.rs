//! Error types for Quill

use thiserror::Error;

/// Main error type for logging operations
#[derive(Error, Debug)]
pub enum LogError {
    /// Text did not match any known level
    #[error("Invalid level: {0:?}")]
    InvalidLevel(String),

    /// The output sink rejected or failed a write or sync
    #[error("Sink write error: {0}")]
    SinkWrite(#[from] std::io::Error),

    /// A field's value could not be represented by the encoder
    #[error("Encode error: {0}")]
    Encode(String),

    /// A configuration document could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl LogError {
    /// Shorthand for building an [`LogError::Encode`] from a marshaler.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias using LogError
pub type LogResult<T> = Result<T, LogError>;
