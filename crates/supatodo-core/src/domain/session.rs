//! Session Entity
//!
//! Server-issued proof of an authenticated identity plus the change
//! notifications the auth service publishes about it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An authenticated session.
///
/// Replaced wholesale on every auth change, never patched in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable identity of the signed-in user
    pub user_id: String,
    pub email: Option<String>,
    /// True when the account was created by the anonymous fallback
    pub is_anonymous: bool,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is rejected
    pub expires_at: Option<i64>,
}

impl Session {
    /// Whether the access token expires within `margin` seconds of `now`.
    ///
    /// Sessions without an expiry never count as expiring.
    pub fn expires_within(&self, now: i64, margin: i64) -> bool {
        self.expires_at
            .map(|expires_at| expires_at - margin <= now)
            .unwrap_or(false)
    }

    /// Seconds from `now` until the token enters the `margin` window, zero
    /// once inside it. `None` when the session has no expiry.
    pub fn seconds_until_refresh(&self, now: i64, margin: i64) -> Option<i64> {
        self.expires_at
            .map(|expires_at| (expires_at - margin - now).max(0))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("is_anonymous", &self.is_anonymous)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Kind of auth-state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// Session settled at startup: found by the lookup, or absent after the
    /// fallback sign-up
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::InitialSession => "INITIAL_SESSION",
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed => "TOKEN_REFRESHED",
        }
    }
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification from the auth change stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

impl AuthChange {
    pub fn new(event: AuthEvent, session: Option<Session>) -> Self {
        Self { event, session }
    }
}
