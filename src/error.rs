use thiserror::Error;

use crate::document::DocHandle;

/// Custom error types for the n-gram index
#[derive(Error, Debug)]
pub enum NgramError {
    /// The handle does not refer to a live document
    #[error("Document handle {0} is not live")]
    InvalidHandle(DocHandle),

    /// Configuration values that cannot produce a working index
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error during JSON processing
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for n-gram index operations
pub type Result<T> = std::result::Result<T, NgramError>;
