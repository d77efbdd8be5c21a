//! Supabase Client Tests
//!
//! Auth and task store calls against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::watch;
use wiremock::matchers::{bearer_token, body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{
    AuthBootstrap, AuthError, AuthService, BootstrapState, Credentials, ShellView, SignUpOptions,
    Subscription,
};
use crate::domain::{AuthEvent, NewTask, Session, TaskId};
use crate::repository::{StoreError, TaskStore};
use crate::supabase::{MemorySessionStorage, SessionStorage, SupabaseAuth, SupabaseConfig, SupabaseTasks};

const ANON_KEY: &str = "anon-key";

fn config(server: &MockServer) -> SupabaseConfig {
    SupabaseConfig::new(&server.uri(), ANON_KEY).unwrap()
}

fn session_body(user_id: &str, access_token: &str, anonymous: bool) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": format!("refresh-{access_token}"),
        "user": {
            "id": user_id,
            "email": "someone@example.com",
            "user_metadata": { "is_anonymous": anonymous }
        }
    })
}

fn stored_session(expires_at: Option<i64>) -> Session {
    Session {
        user_id: "u-1".to_string(),
        email: Some("someone@example.com".to_string()),
        is_anonymous: false,
        access_token: "stored-access".to_string(),
        refresh_token: "stored-refresh".to_string(),
        expires_at,
    }
}

/// Storage shared between the client under test and the assertions
#[derive(Clone, Default)]
struct SharedStorage(std::sync::Arc<MemorySessionStorage>);

impl SessionStorage for SharedStorage {
    fn load(&self) -> crate::auth::AuthResult<Option<Session>> {
        self.0.load()
    }
    fn save(&self, session: &Session) -> crate::auth::AuthResult<()> {
        self.0.save(session)
    }
    fn clear(&self) -> crate::auth::AuthResult<()> {
        self.0.clear()
    }
}

fn auth_with(server: &MockServer, existing: Option<Session>) -> (SupabaseAuth, SharedStorage) {
    let storage = SharedStorage::default();
    if let Some(session) = existing {
        storage.save(&session).unwrap();
    }
    let auth = SupabaseAuth::new(config(server), Box::new(storage.clone()));
    (auth, storage)
}

async fn no_event(sub: &mut Subscription) -> bool {
    tokio::time::timeout(Duration::from_millis(50), sub.next())
        .await
        .is_err()
}

// ========================================================================
// Auth
// ========================================================================

#[tokio::test]
async fn test_sign_in_with_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .and(body_json(json!({ "email": "a@b.c", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("u-1", "at-1", false)))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, storage) = auth_with(&server, None);
    let mut sub = auth.subscribe();

    let session = auth
        .sign_in_with_password(&Credentials::new("a@b.c", "pw"))
        .await
        .unwrap();

    assert_eq!(session.user_id, "u-1");
    assert_eq!(session.access_token, "at-1");
    assert!(session.expires_at.unwrap() > Utc::now().timestamp());
    assert_eq!(storage.load().unwrap(), Some(session.clone()));

    let change = sub.next().await.unwrap();
    assert_eq!(change.event, AuthEvent::SignedIn);
    assert_eq!(change.session, Some(session));
}

#[tokio::test]
async fn test_sign_in_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let (auth, storage) = auth_with(&server, None);
    let err = auth
        .sign_in_with_password(&Credentials::new("a@b.c", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Invalid login credentials");
    assert!(matches!(err, AuthError::Rejected { status: 400, .. }));
    assert_eq!(storage.load().unwrap(), None);
}

#[tokio::test]
async fn test_anonymous_sign_up_issues_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(query_param("redirect_to", "https://todo.example/"))
        .and(bearer_token(ANON_KEY))
        .and(body_partial_json(json!({ "data": { "is_anonymous": true } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("anon-1", "at-anon", true)))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, storage) = auth_with(&server, None);
    let mut sub = auth.subscribe();

    let session = auth
        .sign_up(
            &Credentials::anonymous(),
            &SignUpOptions::anonymous(Some("https://todo.example/".to_string())),
        )
        .await
        .unwrap()
        .expect("session issued");

    assert!(session.is_anonymous);
    assert_eq!(storage.load().unwrap(), Some(session.clone()));
    assert_eq!(sub.next().await.unwrap().event, AuthEvent::SignedIn);
}

#[tokio::test]
async fn test_sign_up_pending_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-9",
            "email": "new@example.com",
            "confirmation_sent_at": "2024-05-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let (auth, storage) = auth_with(&server, None);
    let mut sub = auth.subscribe();

    let result = auth
        .sign_up(&Credentials::new("new@example.com", "pw"), &SignUpOptions::new(None))
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(storage.load().unwrap(), None);
    let change = sub.next().await.unwrap();
    assert_eq!(change.event, AuthEvent::InitialSession);
    assert_eq!(change.session, None);
}

#[tokio::test]
async fn test_sign_up_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "code": 422, "msg": "User already registered" })),
        )
        .mount(&server)
        .await;

    let (auth, _) = auth_with(&server, None);
    let mut sub = auth.subscribe();
    let err = auth
        .sign_up(&Credentials::new("a@b.c", "pw"), &SignUpOptions::new(None))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AuthError::Rejected {
            status: 422,
            message: "User already registered".to_string()
        }
    );
    // The failure still settles the session as absent
    assert_eq!(sub.next().await.unwrap().session, None);
}

#[tokio::test]
async fn test_sign_up_failure_is_silent_when_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fresh = stored_session(Some(Utc::now().timestamp() + 3600));
    let (auth, storage) = auth_with(&server, Some(fresh.clone()));
    let mut sub = auth.subscribe();

    assert!(auth
        .sign_up(&Credentials::anonymous(), &SignUpOptions::anonymous(None))
        .await
        .is_err());
    assert!(no_event(&mut sub).await);
    assert_eq!(storage.load().unwrap(), Some(fresh));
}

#[tokio::test]
async fn test_anonymous_sign_up_does_not_replace_stored_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("anon-1", "at-anon", true)))
        .mount(&server)
        .await;

    let real = stored_session(Some(Utc::now().timestamp() + 3600));
    let (auth, storage) = auth_with(&server, Some(real.clone()));
    let mut sub = auth.subscribe();

    let result = auth
        .sign_up(&Credentials::anonymous(), &SignUpOptions::anonymous(None))
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(storage.load().unwrap(), Some(real));
    assert!(no_event(&mut sub).await);
}

#[tokio::test]
async fn test_get_session_without_stored_session() {
    let server = MockServer::start().await;
    let (auth, _) = auth_with(&server, None);
    let mut sub = auth.subscribe();

    assert_eq!(auth.get_session().await.unwrap(), None);
    // Absence is left for the anonymous sign-up to settle
    assert!(no_event(&mut sub).await);
}

#[tokio::test]
async fn test_get_session_returns_fresh_session_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let fresh = stored_session(Some(Utc::now().timestamp() + 3600));
    let (auth, _) = auth_with(&server, Some(fresh.clone()));
    let mut sub = auth.subscribe();

    assert_eq!(auth.get_session().await.unwrap(), Some(fresh.clone()));
    assert_eq!(sub.next().await.unwrap().session, Some(fresh));
}

#[tokio::test]
async fn test_get_session_refreshes_expiring_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "stored-refresh" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("u-1", "at-new", false)))
        .expect(1)
        .mount(&server)
        .await;

    let expiring = stored_session(Some(Utc::now().timestamp() + 5));
    let (auth, storage) = auth_with(&server, Some(expiring));

    let session = auth.get_session().await.unwrap().expect("refreshed");
    assert_eq!(session.access_token, "at-new");
    assert_eq!(storage.load().unwrap(), Some(session));
}

#[tokio::test]
async fn test_get_session_drops_unrefreshable_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&server)
        .await;

    let expired = stored_session(Some(Utc::now().timestamp() - 60));
    let (auth, storage) = auth_with(&server, Some(expired));
    let mut sub = auth.subscribe();

    assert_eq!(auth.get_session().await.unwrap(), None);
    assert_eq!(storage.load().unwrap(), None);
    assert!(no_event(&mut sub).await);
}

#[tokio::test]
async fn test_refresh_session_emits_token_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("u-1", "at-2", false)))
        .mount(&server)
        .await;

    let (auth, _) = auth_with(&server, Some(stored_session(None)));
    let mut sub = auth.subscribe();

    let refreshed = auth.refresh_session().await.unwrap().unwrap();
    let change = sub.next().await.unwrap();
    assert_eq!(change.event, AuthEvent::TokenRefreshed);
    assert_eq!(change.session, Some(refreshed));
}

#[tokio::test]
async fn test_refresh_due_in_tracks_expiry() {
    let server = MockServer::start().await;
    let (auth, storage) = auth_with(&server, None);
    assert_eq!(auth.refresh_due_in(), None);

    storage
        .save(&stored_session(Some(Utc::now().timestamp() + 3600)))
        .unwrap();
    let wait = auth.refresh_due_in().unwrap();
    assert!(wait > Duration::from_secs(3500) && wait <= Duration::from_secs(3570));

    storage
        .save(&stored_session(Some(Utc::now().timestamp() + 5)))
        .unwrap();
    assert_eq!(auth.refresh_due_in(), Some(Duration::ZERO));

    storage.save(&stored_session(None)).unwrap();
    assert_eq!(auth.refresh_due_in(), None);
}

#[tokio::test]
async fn test_refresh_if_due_leaves_fresh_session_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let fresh = stored_session(Some(Utc::now().timestamp() + 3600));
    let (auth, _) = auth_with(&server, Some(fresh.clone()));
    let mut sub = auth.subscribe();

    assert_eq!(auth.refresh_if_due().await.unwrap(), Some(fresh));
    assert!(no_event(&mut sub).await);
}

#[tokio::test]
async fn test_refresh_if_due_signs_out_on_rejected_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&server)
        .await;

    let expiring = stored_session(Some(Utc::now().timestamp() + 5));
    let (auth, storage) = auth_with(&server, Some(expiring));
    let mut sub = auth.subscribe();

    let err = auth.refresh_if_due().await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected { status: 400, .. }));
    assert_eq!(storage.load().unwrap(), None);
    let change = sub.next().await.unwrap();
    assert_eq!(change.event, AuthEvent::SignedOut);
    assert_eq!(change.session, None);
}

#[tokio::test]
async fn test_refresh_if_due_keeps_session_on_transport_error() {
    let cfg = SupabaseConfig::new(&closed_port_url(), ANON_KEY).unwrap();
    let storage = SharedStorage::default();
    let expiring = stored_session(Some(Utc::now().timestamp() + 5));
    storage.save(&expiring).unwrap();
    let auth = SupabaseAuth::new(cfg, Box::new(storage.clone()));

    let err = auth.refresh_if_due().await.unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)));
    assert_eq!(storage.load().unwrap(), Some(expiring));
}

#[tokio::test]
async fn test_sign_out_revokes_and_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("apikey", ANON_KEY))
        .and(bearer_token("stored-access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, storage) = auth_with(&server, Some(stored_session(None)));
    let mut sub = auth.subscribe();

    auth.sign_out().await.unwrap();

    assert_eq!(storage.load().unwrap(), None);
    let change = sub.next().await.unwrap();
    assert_eq!(change.event, AuthEvent::SignedOut);
    assert_eq!(change.session, None);
}

#[tokio::test]
async fn test_sign_out_is_local_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "JWT expired" })))
        .mount(&server)
        .await;

    let (auth, storage) = auth_with(&server, Some(stored_session(None)));
    let mut sub = auth.subscribe();

    let err = auth.sign_out().await.unwrap_err();
    assert_eq!(err.user_message(), "JWT expired");
    assert_eq!(storage.load().unwrap(), None);
    assert_eq!(sub.next().await.unwrap().event, AuthEvent::SignedOut);
}

#[tokio::test]
async fn test_sign_out_without_session_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let (auth, _) = auth_with(&server, None);
    let mut sub = auth.subscribe();

    auth.sign_out().await.unwrap();
    assert_eq!(sub.next().await.unwrap().event, AuthEvent::SignedOut);
}

/// Base URL of a local port nothing listens on
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let cfg = SupabaseConfig::new(&closed_port_url(), ANON_KEY).unwrap();

    let auth = SupabaseAuth::in_memory(cfg);
    let err = auth
        .sign_in_with_password(&Credentials::new("a@b.c", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)));
}

// ========================================================================
// Bootstrap over the HTTP client
// ========================================================================

fn bootstrap_over(auth: &Arc<SupabaseAuth>) -> Arc<AuthBootstrap> {
    let service: Arc<dyn AuthService> = auth.clone();
    Arc::new(AuthBootstrap::new(service).with_email_redirect(Some("https://todo.example/".to_string())))
}

async fn resolved(rx: &mut watch::Receiver<BootstrapState>) -> BootstrapState {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(BootstrapState::is_resolved))
        .await
        .expect("bootstrap resolved in time")
        .unwrap()
        .clone()
}

fn mount_signup(response: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_partial_json(json!({ "data": { "is_anonymous": true } })))
        .respond_with(response)
}

#[tokio::test]
async fn test_bootstrap_restores_stored_session() {
    let server = MockServer::start().await;
    mount_signup(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    let fresh = stored_session(Some(Utc::now().timestamp() + 3600));
    let (auth, _) = auth_with(&server, Some(fresh.clone()));
    let bootstrap = bootstrap_over(&Arc::new(auth));
    let mut rx = bootstrap.watch();
    tokio::spawn(bootstrap.clone().initialize());

    assert_eq!(resolved(&mut rx).await, BootstrapState::Resolved(Some(fresh)));
    assert_eq!(bootstrap.view(), ShellView::Tasks);
    assert!(!bootstrap.signup_attempted());
}

#[tokio::test]
async fn test_bootstrap_stays_loading_until_anonymous_signup_lands() {
    let server = MockServer::start().await;
    mount_signup(
        ResponseTemplate::new(200)
            .set_body_json(session_body("anon-1", "at-anon", true))
            .set_delay(Duration::from_millis(200)),
    )
    .expect(1)
    .mount(&server)
    .await;

    let (auth, storage) = auth_with(&server, None);
    let bootstrap = bootstrap_over(&Arc::new(auth));
    let mut rx = bootstrap.watch();
    tokio::spawn(bootstrap.clone().initialize());

    rx.wait_for(|s| *s == BootstrapState::SigningUpAnonymously)
        .await
        .unwrap();
    assert_eq!(bootstrap.view(), ShellView::Loading);

    let state = resolved(&mut rx).await;
    let session = state.session().expect("anonymous session");
    assert_eq!(session.user_id, "anon-1");
    assert!(session.is_anonymous);
    assert_eq!(bootstrap.view(), ShellView::Tasks);
    assert_eq!(storage.load().unwrap().map(|s| s.user_id), Some("anon-1".to_string()));
}

#[tokio::test]
async fn test_bootstrap_falls_back_to_login_when_signup_fails() {
    let server = MockServer::start().await;
    mount_signup(
        ResponseTemplate::new(422).set_body_json(json!({ "msg": "Anonymous sign-ins are disabled" })),
    )
    .expect(1)
    .mount(&server)
    .await;

    let (auth, storage) = auth_with(&server, None);
    let bootstrap = bootstrap_over(&Arc::new(auth));
    let mut rx = bootstrap.watch();
    tokio::spawn(bootstrap.clone().initialize());

    assert_eq!(resolved(&mut rx).await, BootstrapState::Resolved(None));
    assert_eq!(bootstrap.view(), ShellView::Login);
    assert_eq!(storage.load().unwrap(), None);
}

#[tokio::test]
async fn test_sign_in_during_anonymous_signup_wins() {
    let server = MockServer::start().await;
    mount_signup(
        ResponseTemplate::new(200)
            .set_body_json(session_body("anon-1", "at-anon", true))
            .set_delay(Duration::from_millis(300)),
    )
    .mount(&server)
    .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("real-user", "at-real", false)))
        .mount(&server)
        .await;

    let (auth, storage) = auth_with(&server, None);
    let auth = Arc::new(auth);
    let bootstrap = bootstrap_over(&auth);
    let mut rx = bootstrap.watch();
    tokio::spawn(bootstrap.clone().initialize());

    rx.wait_for(|s| *s == BootstrapState::SigningUpAnonymously)
        .await
        .unwrap();
    assert!(bootstrap.is_loading());

    let real = auth
        .sign_in_with_password(&Credentials::new("a@b.c", "pw"))
        .await
        .unwrap();
    assert_eq!(resolved(&mut rx).await, BootstrapState::Resolved(Some(real.clone())));

    // Let the delayed anonymous response arrive
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(bootstrap.current_session(), Some(real.clone()));
    assert_eq!(storage.load().unwrap(), Some(real));
}

#[tokio::test]
async fn test_expiring_session_refresh_reaches_bootstrap() {
    let server = MockServer::start().await;
    let mut short_lived = session_body("anon-1", "at-anon", true);
    short_lived["expires_in"] = json!(20);
    mount_signup(ResponseTemplate::new(200).set_body_json(short_lived))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "refresh-at-anon" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("anon-1", "at-next", true)))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, _) = auth_with(&server, None);
    let auth = Arc::new(auth);
    let bootstrap = bootstrap_over(&auth);
    let mut rx = bootstrap.watch();
    tokio::spawn(bootstrap.clone().initialize());

    let first = resolved(&mut rx).await;
    assert_eq!(first.session().map(|s| s.access_token.as_str()), Some("at-anon"));
    assert_eq!(auth.refresh_due_in(), Some(Duration::ZERO));

    let mut sub = auth.subscribe();
    let refreshed = auth.refresh_if_due().await.unwrap().expect("refreshed");
    assert_eq!(sub.next().await.unwrap().event, AuthEvent::TokenRefreshed);

    tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.session() == Some(&refreshed)),
    )
    .await
    .expect("refreshed session reached the bootstrap")
    .unwrap();
    assert_eq!(bootstrap.view(), ShellView::Tasks);
}

// ========================================================================
// Tasks
// ========================================================================

fn row(id: i64, text: &str, complete: bool) -> Value {
    json!({
        "id": id,
        "user_id": "u-1",
        "task": text,
        "is_complete": complete,
        "inserted_at": "2024-05-01T12:00:00.123456+00:00"
    })
}

#[tokio::test]
async fn test_list_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .and(query_param("select", "*"))
        .and(query_param("order", "inserted_at.desc"))
        .and(header("apikey", ANON_KEY))
        .and(bearer_token("stored-access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([row(2, "newer", false), row(1, "older", true)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = SupabaseTasks::new(config(&server));
    let tasks = store.list(&stored_session(None)).await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::new("2"));
    assert_eq!(tasks[0].task, "newer");
    assert!(tasks[1].is_complete);
}

#[tokio::test]
async fn test_list_tasks_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "PGRST301",
            "message": "JWT expired"
        })))
        .mount(&server)
        .await;

    let store = SupabaseTasks::new(config(&server));
    let err = store.list(&stored_session(None)).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Rejected {
            status: 401,
            message: "JWT expired".to_string()
        }
    );
}

#[tokio::test]
async fn test_list_tasks_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "a list" })))
        .mount(&server)
        .await;

    let store = SupabaseTasks::new(config(&server));
    let err = store.list(&stored_session(None)).await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn test_create_task_returns_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({ "task": "buy milk", "user_id": "u-1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row(7, "buy milk", false)])))
        .expect(1)
        .mount(&server)
        .await;

    let owner = stored_session(None);
    let store = SupabaseTasks::new(config(&server));
    let draft = NewTask::for_session("  buy milk ", &owner).unwrap();

    let created = store.create(&owner, &draft).await.unwrap();
    assert_eq!(created.id, TaskId::new("7"));
    assert_eq!(created.task, "buy milk");
}

#[tokio::test]
async fn test_create_task_with_empty_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let owner = stored_session(None);
    let store = SupabaseTasks::new(config(&server));
    let draft = NewTask::for_session("x", &owner).unwrap();

    assert!(matches!(store.create(&owner, &draft).await, Err(StoreError::Decode(_))));
}

#[tokio::test]
async fn test_set_completed_patches_row() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "eq.5"))
        .and(body_json(json!({ "is_complete": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = SupabaseTasks::new(config(&server));
    store
        .set_completed(&stored_session(None), &TaskId::new("5"), true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_row() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "eq.5"))
        .and(bearer_token("stored-access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = SupabaseTasks::new(config(&server));
    store
        .delete(&stored_session(None), &TaskId::new("5"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_custom_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = SupabaseTasks::new(config(&server)).with_table("archive");
    assert!(store.list(&stored_session(None)).await.unwrap().is_empty());
}
