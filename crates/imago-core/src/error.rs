//! Error types for the imago catalog browser.

use thiserror::Error;

/// Result type alias using imago's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for imago operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP/network request failed (transport failure or non-success status)
    #[error("Request error: {0}")]
    Request(String),

    /// Catalog item not found by the service
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Focused item no longer present in the current page
    #[error("Focused item not in current page: {0}")]
    FocusNotFound(i64),

    /// Adjacent page has no item to move focus to
    #[error("No adjacent item: {0}")]
    NoAdjacentItem(String),

    /// Invalid input, rejected before any remote call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
