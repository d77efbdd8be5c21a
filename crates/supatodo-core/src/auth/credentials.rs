//! Credentials and sign-up options

use std::fmt;

use serde_json::{Map, Value};
use uuid::Uuid;

/// Domain used for the placeholder e-mail of anonymous accounts
pub const ANONYMOUS_EMAIL_DOMAIN: &str = "example.com";

/// User metadata key marking an account as anonymous
pub const ANONYMOUS_MARKER: &str = "is_anonymous";

/// E-mail and password pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Fresh throwaway credentials for an anonymous account.
    ///
    /// Both halves come from independent v4 UUIDs; nothing is meant to be
    /// remembered or reused.
    pub fn anonymous() -> Self {
        Self {
            email: format!("anon-{}@{}", Uuid::new_v4(), ANONYMOUS_EMAIL_DOMAIN),
            password: Uuid::new_v4().to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Extra options sent with a sign-up request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpOptions {
    /// Where the confirmation e-mail link should land
    pub email_redirect_to: Option<String>,
    /// User metadata stored with the account
    pub data: Map<String, Value>,
}

impl SignUpOptions {
    pub fn new(email_redirect_to: Option<String>) -> Self {
        Self {
            email_redirect_to,
            data: Map::new(),
        }
    }

    /// Options for an account created by the anonymous fallback
    pub fn anonymous(email_redirect_to: Option<String>) -> Self {
        let mut options = Self::new(email_redirect_to);
        options
            .data
            .insert(ANONYMOUS_MARKER.to_string(), Value::Bool(true));
        options
    }

    pub fn is_anonymous(&self) -> bool {
        self.data
            .get(ANONYMOUS_MARKER)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_credentials_shape() {
        let creds = Credentials::anonymous();
        let local = creds
            .email
            .strip_prefix("anon-")
            .and_then(|rest| rest.strip_suffix("@example.com"))
            .expect("anon-<uuid>@example.com");
        assert!(Uuid::parse_str(local).is_ok());
        assert!(Uuid::parse_str(&creds.password).is_ok());
    }

    #[test]
    fn test_anonymous_credentials_are_unique() {
        let a = Credentials::anonymous();
        let b = Credentials::anonymous();
        assert_ne!(a.email, b.email);
        assert_ne!(a.password, b.password);
        assert_ne!(a.password, a.email);
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("me@example.com", "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_anonymous_options_carry_marker() {
        let options = SignUpOptions::anonymous(Some("https://todo.example".to_string()));
        assert!(options.is_anonymous());
        assert_eq!(
            options.email_redirect_to.as_deref(),
            Some("https://todo.example")
        );
        assert!(!SignUpOptions::new(None).is_anonymous());
    }
}
