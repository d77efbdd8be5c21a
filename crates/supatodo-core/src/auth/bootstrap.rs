//! Auth Bootstrap
//!
//! Resolves, once per application load, whether a usable session exists,
//! creating a throwaway anonymous account when none does.
//!
//! Only the subscription listener commits resolved state. The startup path
//! (session lookup, anonymous sign-up) merely initiates work and advances the
//! pending phase; its direct results are logged and otherwise ignored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::credentials::{Credentials, SignUpOptions};
use super::events::SubscriptionHandle;
use super::service::AuthService;
use crate::domain::{AuthChange, Session};

/// Lifecycle of the application's session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BootstrapState {
    #[default]
    Unknown,
    CheckingSession,
    SigningUpAnonymously,
    /// Final session known (present or absent). Not terminal: later changes
    /// move between resolved values.
    Resolved(Option<Session>),
}

impl BootstrapState {
    pub fn is_loading(&self) -> bool {
        !self.is_resolved()
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BootstrapState::Resolved(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            BootstrapState::Resolved(session) => session.as_ref(),
            _ => None,
        }
    }
}

/// Top-level view the shell should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellView {
    Loading,
    Login,
    Tasks,
}

impl ShellView {
    /// Derived from state on every call; never stored.
    pub fn of(state: &BootstrapState) -> Self {
        match state {
            BootstrapState::Resolved(Some(_)) => ShellView::Tasks,
            BootstrapState::Resolved(None) => ShellView::Login,
            _ => ShellView::Loading,
        }
    }
}

/// Owner of the session lifecycle for one application instance
pub struct AuthBootstrap {
    service: Arc<dyn AuthService>,
    email_redirect_to: Option<String>,
    state: watch::Sender<BootstrapState>,
    initialized: AtomicBool,
    signup_attempted: AtomicBool,
    alive: AtomicBool,
    subscription: Mutex<Option<SubscriptionHandle>>,
}

impl AuthBootstrap {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        let (state, _) = watch::channel(BootstrapState::Unknown);
        Self {
            service,
            email_redirect_to: None,
            state,
            initialized: AtomicBool::new(false),
            signup_attempted: AtomicBool::new(false),
            alive: AtomicBool::new(true),
            subscription: Mutex::new(None),
        }
    }

    /// Redirect target passed along with the anonymous sign-up
    pub fn with_email_redirect(mut self, email_redirect_to: Option<String>) -> Self {
        self.email_redirect_to = email_redirect_to;
        self
    }

    /// Start the bootstrap.
    ///
    /// The returned future registers the change subscription, runs the
    /// startup sequence, and keeps applying notifications until
    /// [`teardown`](Self::teardown). Spawn it on the host executor. Calling it
    /// again is a no-op that completes immediately.
    pub async fn initialize(self: Arc<Self>) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("auth bootstrap already initialized, ignoring");
            return;
        }
        if !self.is_alive() {
            return;
        }

        let mut subscription = self.service.subscribe();
        *self.subscription_slot() = Some(subscription.handle());
        if !self.is_alive() {
            subscription.unsubscribe();
            return;
        }

        let listener = async {
            while let Some(change) = subscription.next().await {
                self.on_session_changed(change);
            }
            debug!("auth subscription closed");
        };

        tokio::join!(self.check_session(), listener);
    }

    async fn check_session(&self) {
        info!("initializing auth flow");
        self.advance(BootstrapState::CheckingSession);

        let existing = match self.service.get_session().await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "session lookup failed");
                None
            }
        };
        if !self.is_alive() {
            return;
        }

        match existing {
            Some(session) => debug!(user_id = %session.user_id, "existing session found"),
            None => {
                debug!("no current session, attempting anonymous signup");
                self.attempt_anonymous_signup().await;
            }
        }
    }

    /// Create a disposable anonymous account, at most once per bootstrap.
    ///
    /// Failures are logged and swallowed. The outcome reaches the UI only
    /// through the change subscription.
    pub async fn attempt_anonymous_signup(&self) {
        if self.signup_attempted.swap(true, Ordering::SeqCst) {
            debug!("anonymous signup already attempted, skipping");
            return;
        }
        if !self.is_alive() {
            return;
        }
        self.advance(BootstrapState::SigningUpAnonymously);

        let credentials = Credentials::anonymous();
        let options = SignUpOptions::anonymous(self.email_redirect_to.clone());

        info!("attempting anonymous signup");
        match self.service.sign_up(&credentials, &options).await {
            Ok(Some(session)) => info!(user_id = %session.user_id, "anonymous user signed up"),
            Ok(None) => info!("anonymous account created without a session"),
            Err(err) => error!(error = %err, "anonymous signup failed"),
        }
    }

    /// Apply a notification from the auth service. Sole writer of resolved
    /// state; ignored after teardown.
    pub fn on_session_changed(&self, change: AuthChange) {
        if !self.is_alive() {
            debug!(event = %change.event, "auth change after teardown ignored");
            return;
        }
        debug!(
            event = %change.event,
            user_id = change.session.as_ref().map(|s| s.user_id.as_str()),
            "auth state changed"
        );
        self.state.send_replace(BootstrapState::Resolved(change.session));
    }

    /// Stop listening and refuse any further state writes
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Some(handle) = self.subscription_slot().take() {
            handle.unsubscribe();
        }
        debug!("auth bootstrap torn down");
    }

    /// Move through the pending phases. Never overrides a resolved state.
    fn advance(&self, next: BootstrapState) {
        if !self.is_alive() {
            return;
        }
        self.state.send_if_modified(|current| {
            if current.is_resolved() || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn subscription_slot(&self) -> MutexGuard<'_, Option<SubscriptionHandle>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    // ========================
    // Observers
    // ========================

    pub fn state(&self) -> BootstrapState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    pub fn view(&self) -> ShellView {
        ShellView::of(&self.state.borrow())
    }

    /// Receiver that is notified on every state change
    pub fn watch(&self) -> watch::Receiver<BootstrapState> {
        self.state.subscribe()
    }

    pub fn signup_attempted(&self) -> bool {
        self.signup_attempted.load(Ordering::SeqCst)
    }
}
