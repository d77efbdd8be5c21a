//! Session persistence
//!
//! Keeps the current session across page loads. The browser build plugs in
//! `localStorage`; everything else uses memory.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::auth::AuthResult;
use crate::domain::Session;

pub trait SessionStorage: Send + Sync {
    fn load(&self) -> AuthResult<Option<Session>>;
    fn save(&self, session: &Session) -> AuthResult<()>;
    fn clear(&self) -> AuthResult<()>;
}

#[derive(Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a session already stored
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Session>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> AuthResult<Option<Session>> {
        Ok(self.slot().clone())
    }

    fn save(&self, session: &Session) -> AuthResult<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
