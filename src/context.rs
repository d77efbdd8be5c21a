//! Application Context
//!
//! Shared services and auth state provided via Leptos Context API.

use std::sync::Arc;

use leptos::prelude::*;
use supatodo_core::auth::{AuthService, BootstrapState};
use supatodo_core::domain::Session;
use supatodo_core::repository::TaskStore;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    auth: StoredValue<Arc<dyn AuthService>>,
    tasks: StoredValue<Arc<dyn TaskStore>>,
    /// Latest bootstrap state, mirrored from the bootstrap's watch channel
    pub auth_state: ReadSignal<BootstrapState>,
    /// Landing page for confirmation e-mails
    email_redirect_to: StoredValue<Option<String>>,
}

impl AppContext {
    pub fn new(
        auth: Arc<dyn AuthService>,
        tasks: Arc<dyn TaskStore>,
        auth_state: ReadSignal<BootstrapState>,
        email_redirect_to: Option<String>,
    ) -> Self {
        Self {
            auth: StoredValue::new(auth),
            tasks: StoredValue::new(tasks),
            auth_state,
            email_redirect_to: StoredValue::new(email_redirect_to),
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.get_value()
    }

    pub fn tasks(&self) -> Arc<dyn TaskStore> {
        self.tasks.get_value()
    }

    pub fn email_redirect_to(&self) -> Option<String> {
        self.email_redirect_to.get_value()
    }

    /// Session of the resolved state (tracked)
    pub fn session(&self) -> Option<Session> {
        self.auth_state.with(|state| state.session().cloned())
    }

    /// Session of the resolved state (untracked, for event handlers)
    pub fn session_untracked(&self) -> Option<Session> {
        self.auth_state
            .with_untracked(|state| state.session().cloned())
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
