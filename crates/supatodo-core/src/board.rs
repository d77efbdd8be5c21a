//! Task Board
//!
//! Operations behind the main list view: load, add, toggle and delete, with
//! the user-facing messages the view shows when they fail. `TaskList` keeps
//! the local copy in step after a remote call succeeds.

use tracing::error;

use crate::domain::{DomainError, Entity, NewTask, Session, Task, TaskId};
use crate::repository::{StoreError, TaskStore};

/// Failure of a board operation, displayed verbatim by the view
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Please log in to view your todos.")]
    NotSignedIn,
    #[error("User not authenticated.")]
    NotAuthenticated,
    #[error("Failed to load todos: {0}")]
    Load(StoreError),
    #[error("Failed to add todo.")]
    Add(StoreError),
    #[error("Failed to update todo.")]
    Toggle(StoreError),
    #[error("Failed to delete todo.")]
    Delete(StoreError),
}

/// Fetch the user's tasks, newest first
pub async fn load_tasks(
    store: &dyn TaskStore,
    session: Option<&Session>,
) -> Result<Vec<Task>, BoardError> {
    let Some(session) = session else {
        error!("user not authenticated for fetching todos");
        return Err(BoardError::NotSignedIn);
    };
    store.list(session).await.map_err(|err| {
        error!(error = %err, "error fetching todos");
        BoardError::Load(err)
    })
}

/// Create a task from form text.
///
/// Blank text is ignored (`Ok(None)`) without contacting the store.
pub async fn add_task(
    store: &dyn TaskStore,
    session: Option<&Session>,
    text: &str,
) -> Result<Option<Task>, BoardError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let Some(session) = session else {
        return Err(BoardError::NotAuthenticated);
    };
    let draft = match NewTask::for_session(text, session) {
        Ok(draft) => draft,
        Err(DomainError::InvalidInput(_)) => return Ok(None),
    };
    store.create(session, &draft).await.map(Some).map_err(|err| {
        error!(error = %err, "error adding todo");
        BoardError::Add(err)
    })
}

/// Flip completion; returns the updated task
pub async fn toggle_task(
    store: &dyn TaskStore,
    session: Option<&Session>,
    task: &Task,
) -> Result<Task, BoardError> {
    let session = session.ok_or(BoardError::NotAuthenticated)?;
    let completed = !task.is_complete;
    store
        .set_completed(session, task.id(), completed)
        .await
        .map_err(|err| {
            error!(error = %err, task_id = %task.id, "error toggling todo");
            BoardError::Toggle(err)
        })?;
    Ok(Task {
        is_complete: completed,
        ..task.clone()
    })
}

/// Delete a task
pub async fn remove_task(
    store: &dyn TaskStore,
    session: Option<&Session>,
    id: &TaskId,
) -> Result<(), BoardError> {
    let session = session.ok_or(BoardError::NotAuthenticated)?;
    store.delete(session, id).await.map_err(|err| {
        error!(error = %err, task_id = %id, "error deleting todo");
        BoardError::Delete(err)
    })
}

/// Local list of tasks as displayed, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// A freshly created task goes on top
    pub fn prepend(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Replace the task with the same ID; returns false if absent
    pub fn replace(&mut self, updated: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id() == updated.id()) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &TaskId) {
        self.tasks.retain(|t| t.id() != id);
    }

    pub fn into_inner(self) -> Vec<Task> {
        self.tasks
    }
}
