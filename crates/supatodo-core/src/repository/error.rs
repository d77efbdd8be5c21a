//! Task Store Errors

/// Result type for task store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a [`TaskStore`](super::TaskStore)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend refused the request (permissions, constraint, ...)
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("task {0} not found")]
    NotFound(String),
}
