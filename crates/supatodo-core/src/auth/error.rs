//! Auth Errors

/// Result type for auth service calls
pub type AuthResult<T> = Result<T, AuthError>;

/// Failures reported by an [`AuthService`](super::AuthService)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The service refused the request (bad credentials, duplicate account, ...)
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The request never produced a response
    #[error("Network error: {0}")]
    Transport(String),
    /// The response could not be understood
    #[error("Unexpected response from auth service: {0}")]
    Decode(String),
    /// Reading or writing the persisted session failed
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Message suitable for showing next to the login form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            AuthError::Rejected { status, .. } => format!("Request rejected ({status})"),
            other => other.to_string(),
        }
    }
}
