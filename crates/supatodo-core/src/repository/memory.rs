//! In-Memory Task Store
//!
//! Process-local implementation of `TaskStore`, used by tests and offline
//! demos. Rows are kept in insertion order; listing walks them backwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::error::{StoreError, StoreResult};
use super::traits::TaskStore;
use crate::domain::{NewTask, Session, Task, TaskId};

#[derive(Default)]
pub struct MemoryTaskStore {
    next_id: AtomicU64,
    rows: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Task>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Total rows across every user
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a row owned by `user_id`, as row-level security would
    fn with_owned_row<R>(
        &self,
        session: &Session,
        id: &TaskId,
        f: impl FnOnce(&mut Vec<Task>, usize) -> R,
    ) -> StoreResult<R> {
        let mut rows = self.rows();
        let index = rows
            .iter()
            .position(|t| &t.id == id && t.user_id == session.user_id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(f(&mut rows, index))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, session: &Session) -> StoreResult<Vec<Task>> {
        Ok(self
            .rows()
            .iter()
            .rev()
            .filter(|t| t.user_id == session.user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, session: &Session, draft: &NewTask) -> StoreResult<Task> {
        if draft.user_id != session.user_id {
            return Err(StoreError::Rejected {
                status: 403,
                message: "new row violates row-level security policy".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let task = Task {
            id: TaskId::new(id.to_string()),
            user_id: draft.user_id.clone(),
            task: draft.task.clone(),
            is_complete: false,
            inserted_at: Utc::now(),
        };
        self.rows().push(task.clone());
        Ok(task)
    }

    async fn set_completed(
        &self,
        session: &Session,
        id: &TaskId,
        completed: bool,
    ) -> StoreResult<()> {
        self.with_owned_row(session, id, |rows, index| {
            rows[index].is_complete = completed;
        })
    }

    async fn delete(&self, session: &Session, id: &TaskId) -> StoreResult<()> {
        self.with_owned_row(session, id, |rows, index| {
            rows.remove(index);
        })
    }
}
