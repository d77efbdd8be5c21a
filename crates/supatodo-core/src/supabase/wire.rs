//! Supabase wire formats
//!
//! JSON bodies exchanged with GoTrue and PostgREST, and the mapping of HTTP
//! failures onto the auth and store error types.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::{AuthError, ANONYMOUS_MARKER};
use crate::domain::Session;
use crate::repository::StoreError;

/// Anything that went wrong between sending a request and decoding its body
#[derive(Debug)]
pub(crate) enum HttpFailure {
    Status { status: u16, message: String },
    Transport(String),
    Decode(String),
}

impl From<reqwest::Error> for HttpFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            HttpFailure::Decode(err.to_string())
        } else {
            HttpFailure::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for HttpFailure {
    fn from(err: url::ParseError) -> Self {
        HttpFailure::Transport(format!("invalid endpoint: {err}"))
    }
}

impl From<HttpFailure> for AuthError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Status { status, message } => AuthError::Rejected { status, message },
            HttpFailure::Transport(reason) => AuthError::Transport(reason),
            HttpFailure::Decode(reason) => AuthError::Decode(reason),
        }
    }
}

impl From<HttpFailure> for StoreError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Status { status, message } => StoreError::Rejected { status, message },
            HttpFailure::Transport(reason) => StoreError::Transport(reason),
            HttpFailure::Decode(reason) => StoreError::Decode(reason),
        }
    }
}

/// Error body shapes used across GoTrue versions and PostgREST
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Human-readable message from an error response
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error_description.or(b.msg).or(b.message).or(b.error))
        .filter(|m| !m.trim().is_empty());

    match parsed {
        Some(message) => message,
        None if body.trim().is_empty() => format!("HTTP {status}"),
        None => body.trim().to_string(),
    }
}

async fn checked_body(response: Response) -> Result<String, HttpFailure> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(HttpFailure::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }
}

/// Decode a successful JSON response
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, HttpFailure> {
    let body = checked_body(response).await?;
    serde_json::from_str(&body).map_err(|e| HttpFailure::Decode(e.to_string()))
}

/// Require a 2xx status and discard the body
pub(crate) async fn expect_success(response: Response) -> Result<(), HttpFailure> {
    checked_body(response).await.map(drop)
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserPayload {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    /// Set by GoTrue builds with native anonymous sign-in
    #[serde(default)]
    pub is_anonymous: Option<bool>,
}

impl UserPayload {
    fn is_anonymous(&self) -> bool {
        self.user_metadata
            .get(ANONYMOUS_MARKER)
            .and_then(Value::as_bool)
            .or(self.is_anonymous)
            .unwrap_or(false)
    }
}

/// Token grant / sign-up response carrying a session
#[derive(Debug, Deserialize)]
pub(crate) struct SessionPayload {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: UserPayload,
}

impl SessionPayload {
    /// `now` anchors `expires_in` when the server omits `expires_at`
    pub fn into_session(self, now: i64) -> Session {
        let is_anonymous = self.user.is_anonymous();
        Session {
            expires_at: self.expires_at.or(self.expires_in.map(|secs| now + secs)),
            user_id: self.user.id,
            email: self.user.email,
            is_anonymous,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

/// Sign-up response: a session when one was issued, otherwise only the user
pub(crate) fn session_from_signup(body: Value, now: i64) -> Result<Option<Session>, HttpFailure> {
    if body.get("access_token").is_none() {
        return Ok(None);
    }
    serde_json::from_value::<SessionPayload>(body)
        .map(|payload| Some(payload.into_session(now)))
        .map_err(|e| HttpFailure::Decode(e.to_string()))
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: &'a Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionPatch {
    pub is_complete: bool,
}
