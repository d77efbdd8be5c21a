//! Supabase Auth (GoTrue) client

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use super::config::SupabaseConfig;
use super::storage::{MemorySessionStorage, SessionStorage};
use super::wire::{
    expect_success, read_json, session_from_signup, HttpFailure, PasswordGrant, RefreshGrant,
    SessionPayload, SignUpBody,
};
use crate::auth::{
    AuthError, AuthEvents, AuthResult, AuthService, Credentials, SignUpOptions, Subscription,
};
use crate::domain::{AuthEvent, Session};

/// Stored sessions this close to expiry are refreshed before use
pub const REFRESH_MARGIN_SECS: i64 = 30;

fn now() -> i64 {
    Utc::now().timestamp()
}

/// [`AuthService`] backed by a Supabase project's `auth/v1` endpoints
pub struct SupabaseAuth {
    http: Client,
    config: SupabaseConfig,
    storage: Box<dyn SessionStorage>,
    events: AuthEvents,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig, storage: Box<dyn SessionStorage>) -> Self {
        Self {
            http: Client::new(),
            config,
            storage,
            events: AuthEvents::new(),
        }
    }

    /// Client that forgets its session when dropped
    pub fn in_memory(config: SupabaseConfig) -> Self {
        Self::new(config, Box::new(MemorySessionStorage::new()))
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Exchange the stored refresh token for a new session
    pub async fn refresh_session(&self) -> AuthResult<Option<Session>> {
        let Some(stored) = self.storage.load()? else {
            return Ok(None);
        };
        let refreshed = self.refresh(&stored).await?;
        self.events
            .emit(AuthEvent::TokenRefreshed, Some(refreshed.clone()));
        Ok(Some(refreshed))
    }

    /// Time left before the stored session should be refreshed.
    ///
    /// `None` when nothing is stored or the session never expires.
    pub fn refresh_due_in(&self) -> Option<Duration> {
        let stored = self.stored()?;
        let seconds = stored.seconds_until_refresh(now(), REFRESH_MARGIN_SECS)?;
        Some(Duration::from_secs(seconds.unsigned_abs()))
    }

    /// Refresh the stored session if it is about to expire.
    ///
    /// A refresh token the server rejects ends the session locally.
    pub async fn refresh_if_due(&self) -> AuthResult<Option<Session>> {
        let Some(stored) = self.stored() else {
            return Ok(None);
        };
        if !stored.expires_within(now(), REFRESH_MARGIN_SECS) {
            return Ok(Some(stored));
        }
        match self.refresh_session().await {
            Err(err @ AuthError::Rejected { .. }) => {
                warn!(error = %err, "refresh token rejected, signing out locally");
                self.forget();
                self.events.emit(AuthEvent::SignedOut, None);
                Err(err)
            }
            other => other,
        }
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.http
            .post(url)
            .header("apikey", &self.config.anon_key)
    }

    async fn token_grant<B: Serialize + ?Sized>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<Session, HttpFailure> {
        let mut url = self.config.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let response = self
            .post(url)
            .bearer_auth(&self.config.anon_key)
            .json(body)
            .send()
            .await?;
        let payload: SessionPayload = read_json(response).await?;
        Ok(payload.into_session(now()))
    }

    async fn refresh(&self, stale: &Session) -> AuthResult<Session> {
        debug!(user_id = %stale.user_id, "refreshing session");
        let refreshed = self
            .token_grant(
                "refresh_token",
                &RefreshGrant {
                    refresh_token: &stale.refresh_token,
                },
            )
            .await?;
        self.remember(&refreshed);
        Ok(refreshed)
    }

    async fn request_sign_up(
        &self,
        credentials: &Credentials,
        options: &SignUpOptions,
    ) -> Result<Option<Session>, HttpFailure> {
        let mut url = self.config.endpoint("auth/v1/signup")?;
        if let Some(redirect) = &options.email_redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }
        let response = self
            .post(url)
            .bearer_auth(&self.config.anon_key)
            .json(&SignUpBody {
                email: &credentials.email,
                password: &credentials.password,
                data: &options.data,
            })
            .send()
            .await?;
        session_from_signup(read_json(response).await?, now())
    }

    /// Server-side logout of one session
    async fn revoke(&self, session: &Session) -> Result<(), HttpFailure> {
        let url = self.config.endpoint("auth/v1/logout")?;
        let response = self
            .post(url)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        expect_success(response).await
    }

    /// Persisted session, treating unreadable storage as empty
    fn stored(&self) -> Option<Session> {
        self.storage.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not read persisted session");
            None
        })
    }

    fn remember(&self, session: &Session) {
        if let Err(err) = self.storage.save(session) {
            warn!(error = %err, "failed to persist session");
        }
    }

    fn forget(&self) {
        if let Err(err) = self.storage.clear() {
            warn!(error = %err, "failed to clear persisted session");
        }
    }

    /// Stored session, refreshed when close to expiry. A session that
    /// cannot be refreshed is dropped.
    async fn restore(&self) -> AuthResult<Option<Session>> {
        let Some(stored) = self.storage.load()? else {
            return Ok(None);
        };
        if !stored.expires_within(now(), REFRESH_MARGIN_SECS) {
            return Ok(Some(stored));
        }
        match self.refresh(&stored).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(err) => {
                warn!(error = %err, "stored session could not be refreshed");
                self.forget();
                Ok(None)
            }
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthService for SupabaseAuth {
    async fn get_session(&self) -> AuthResult<Option<Session>> {
        let session = self.restore().await?;
        // An absent session is announced by whatever settles it next
        if let Some(found) = &session {
            self.events
                .emit(AuthEvent::InitialSession, Some(found.clone()));
        }
        Ok(session)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        options: &SignUpOptions,
    ) -> AuthResult<Option<Session>> {
        let outcome = self
            .request_sign_up(credentials, options)
            .await
            .map_err(AuthError::from);
        let stored = self.stored();

        match &outcome {
            // A throwaway account never replaces a session that appeared meanwhile
            Ok(Some(session)) if options.is_anonymous() && stored.is_some() => {
                info!(user_id = %session.user_id, "anonymous sign-up superseded, discarding");
                return Ok(None);
            }
            Ok(Some(session)) => {
                info!(user_id = %session.user_id, anonymous = session.is_anonymous, "signed up");
                self.remember(session);
                self.events.emit(AuthEvent::SignedIn, Some(session.clone()));
            }
            Ok(None) => info!("signed up, confirmation pending"),
            Err(err) => debug!(error = %err, "sign-up failed"),
        }

        if matches!(outcome, Ok(None) | Err(_)) && stored.is_none() {
            self.events.emit(AuthEvent::InitialSession, None);
        }
        outcome
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<Session> {
        let session = self
            .token_grant(
                "password",
                &PasswordGrant {
                    email: &credentials.email,
                    password: &credentials.password,
                },
            )
            .await?;

        info!(user_id = %session.user_id, "signed in");
        self.remember(&session);
        self.events.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let remote = match self.stored() {
            Some(session) => self.revoke(&session).await,
            None => Ok(()),
        };

        // Local sign-out happens regardless of what the server said
        self.forget();
        self.events.emit(AuthEvent::SignedOut, None);
        info!("signed out");
        remote.map_err(AuthError::from)
    }

    fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }
}
