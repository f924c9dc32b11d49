//! Error types for the report source

use thiserror::Error;

/// Errors surfaced by [`OcrSource::pull`](crate::OcrSource::pull) and its collaborators
///
/// None of these are retried internally. The host decides whether to call
/// `pull` again.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Missing or invalid construction input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request never produced a usable response (transport failure or
    /// error status)
    #[error("Protocol error: {0}")]
    Protocol(#[from] reqwest::Error),

    /// The API answered, but not with a CSV document
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A CSV record could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] csv::Error),

    /// Spooling the response body failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result alias used throughout the source
pub type Result<T, E = SourceError> = std::result::Result<T, E>;
