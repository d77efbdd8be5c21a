//! Login form actions
//!
//! Explicit, user-initiated auth calls. Every outcome becomes a notice for
//! the form; nothing here returns an error to the caller.

use tracing::{error, info};

use super::credentials::{Credentials, SignUpOptions};
use super::service::AuthService;

pub const SIGN_UP_NOTICE: &str = "Check your email for the login link!";
pub const SIGN_IN_NOTICE: &str = "Signed in successfully!";

/// Which submit the login form performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialMode {
    #[default]
    SignIn,
    SignUp,
}

impl CredentialMode {
    pub fn toggled(self) -> Self {
        match self {
            CredentialMode::SignIn => CredentialMode::SignUp,
            CredentialMode::SignUp => CredentialMode::SignIn,
        }
    }
}

/// Message shown under the login form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthNotice {
    Success(String),
    Failure(String),
}

impl AuthNotice {
    pub fn message(&self) -> &str {
        match self {
            AuthNotice::Success(msg) | AuthNotice::Failure(msg) => msg,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthNotice::Success(_))
    }
}

/// Submit the login form
pub async fn submit_credentials(
    service: &dyn AuthService,
    mode: CredentialMode,
    email: &str,
    password: &str,
    email_redirect_to: Option<String>,
) -> AuthNotice {
    let credentials = Credentials::new(email.trim(), password);

    let outcome = match mode {
        CredentialMode::SignUp => service
            .sign_up(&credentials, &SignUpOptions::new(email_redirect_to))
            .await
            .map(|_| SIGN_UP_NOTICE),
        CredentialMode::SignIn => service
            .sign_in_with_password(&credentials)
            .await
            .map(|_| SIGN_IN_NOTICE),
    };

    match outcome {
        Ok(message) => {
            info!(?mode, "credential submit succeeded");
            AuthNotice::Success(message.to_string())
        }
        Err(err) => {
            error!(?mode, error = %err, "credential submit failed");
            AuthNotice::Failure(err.user_message())
        }
    }
}

/// Sign out; failures are only logged
pub async fn sign_out(service: &dyn AuthService) {
    if let Err(err) = service.sign_out().await {
        error!(error = %err, "error logging out");
    }
}
