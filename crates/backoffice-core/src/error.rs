//! Error types for the back-office core

use thiserror::Error;

/// Core error type for back-office operations
#[derive(Error, Debug)]
pub enum BackofficeError {
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for back-office operations
pub type Result<T> = std::result::Result<T, BackofficeError>;
