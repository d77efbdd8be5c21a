//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for task data access.
//! Implementations: Supabase PostgREST, in-memory.

use async_trait::async_trait;

use super::error::StoreResult;
use crate::domain::{NewTask, Session, Task, TaskId};

/// CRUD on the signed-in user's tasks
///
/// Every call is scoped to the identity in `session`; rows owned by other
/// users are invisible.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TaskStore: Send + Sync {
    /// All tasks of the session's user, newest first
    async fn list(&self, session: &Session) -> StoreResult<Vec<Task>>;

    /// Insert a task and return the stored row
    async fn create(&self, session: &Session, draft: &NewTask) -> StoreResult<Task>;

    /// Set the completion flag
    async fn set_completed(&self, session: &Session, id: &TaskId, completed: bool)
        -> StoreResult<()>;

    /// Delete by ID
    async fn delete(&self, session: &Session, id: &TaskId) -> StoreResult<()>;
}
