//! Auth change notifications
//!
//! Each subscriber gets its own unbounded channel. Unsubscribing drops the
//! sending half, so the subscriber's stream ends once it has drained whatever
//! was already queued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use crate::domain::{AuthChange, AuthEvent, Session};

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<u64, mpsc::UnboundedSender<AuthChange>>>,
}

impl Registry {
    fn listeners(&self) -> MutexGuard<'_, HashMap<u64, mpsc::UnboundedSender<AuthChange>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fan-out point for auth changes, owned by an auth service implementation
#[derive(Clone, Default)]
pub struct AuthEvents {
    registry: Arc<Registry>,
}

impl AuthEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener
    pub fn subscribe(&self) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.listeners().insert(id, tx);
        Subscription {
            events: rx,
            handle: SubscriptionHandle {
                id,
                registry: Arc::downgrade(&self.registry),
            },
        }
    }

    /// Deliver a change to every current listener
    pub fn emit(&self, event: AuthEvent, session: Option<Session>) {
        let change = AuthChange::new(event, session);
        self.registry
            .listeners()
            .retain(|_, tx| tx.send(change.clone()).is_ok());
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.registry.listeners().len()
    }
}

/// Receiving end of an auth change subscription
pub struct Subscription {
    events: mpsc::UnboundedReceiver<AuthChange>,
    handle: SubscriptionHandle,
}

impl Subscription {
    /// Next change, or `None` once unsubscribed and drained
    pub async fn next(&mut self) -> Option<AuthChange> {
        self.events.recv().await
    }

    /// Cancellation handle that can be stored apart from the stream
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    pub fn unsubscribe(&self) {
        self.handle.unsubscribe();
    }
}

/// Detached cancellation handle for a [`Subscription`]
#[derive(Clone)]
pub struct SubscriptionHandle {
    id: u64,
    registry: Weak<Registry>,
}

impl SubscriptionHandle {
    /// Stop delivery. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.listeners().remove(&self.id);
        }
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle").field("id", &self.id).finish()
    }
}
