// Error types for celebration operations

use thiserror::Error;

/// Result type alias for celebration operations
pub type Result<T> = std::result::Result<T, CelebrationError>;

/// Errors that can occur while managing events or notifying about them
#[derive(Debug, Error)]
pub enum CelebrationError {
    /// Input rejected before reaching storage
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage collaborator failure (message preserved verbatim)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Fatal CSV transfer failure
    #[error("CSV error: {0}")]
    Csv(String),

    /// Delivery failure for a single notification
    #[error("Notification error: {0}")]
    Notification(String),

    /// Operation was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CelebrationError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        CelebrationError::Validation(msg.into())
    }

    /// Create a storage error
    pub fn store(msg: impl Into<String>) -> Self {
        CelebrationError::Storage(msg.into())
    }

    /// Create a CSV error
    pub fn csv(msg: impl Into<String>) -> Self {
        CelebrationError::Csv(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        CelebrationError::Notification(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CelebrationError::Validation(_))
    }
}

impl From<csv::Error> for CelebrationError {
    fn from(e: csv::Error) -> Self {
        CelebrationError::Csv(e.to_string())
    }
}
