//! Auth Service - Core Trait
//!
//! Abstract interface to the hosted auth backend.
//! Implementations: Supabase GoTrue over HTTP, scripted doubles in tests.

use async_trait::async_trait;

use super::credentials::{Credentials, SignUpOptions};
use super::error::AuthResult;
use super::events::Subscription;
use crate::domain::Session;

/// Remote authentication backend
///
/// Contract: every call that settles the session (including the first
/// `get_session`) is followed by at least one notification on the
/// subscription stream.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthService: Send + Sync {
    /// Current session, if any
    async fn get_session(&self) -> AuthResult<Option<Session>>;

    /// Create an account. `Ok(None)` means the account exists but no session
    /// was issued yet (e.g. e-mail confirmation pending).
    async fn sign_up(
        &self,
        credentials: &Credentials,
        options: &SignUpOptions,
    ) -> AuthResult<Option<Session>>;

    /// Sign in with e-mail and password
    async fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<Session>;

    /// End the current session
    async fn sign_out(&self) -> AuthResult<()>;

    /// Register for auth change notifications
    fn subscribe(&self) -> Subscription;
}
