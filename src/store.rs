//! Task Board State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use supatodo_core::board::TaskList;
use supatodo_core::domain::{Task, TaskId};

/// Board state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    /// Tasks of the signed-in user, newest first
    pub tasks: Vec<Task>,
    /// Message from the last failed load or add
    pub error: Option<String>,
    /// True while the task list is being fetched
    pub loading: bool,
}

/// Type alias for the store
pub type BoardStore = Store<BoardState>;

/// Get the board store from context
pub fn use_board_store() -> BoardStore {
    expect_context::<BoardStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Run a `TaskList` edit against the stored tasks.
///
/// No-op once the board has been unmounted.
fn edit_tasks(store: &BoardStore, edit: impl FnOnce(&mut TaskList)) {
    let field = store.tasks();
    let Some(mut tasks) = field.try_write() else {
        return;
    };
    let mut list = TaskList::new(std::mem::take(&mut *tasks));
    edit(&mut list);
    *tasks = list.into_inner();
}

/// Replace the whole list after a load
pub fn store_set_tasks(store: &BoardStore, tasks: Vec<Task>) {
    store.tasks().try_set(tasks);
    store.error().try_set(None);
}

/// Put a freshly created task on top
pub fn store_prepend_task(store: &BoardStore, task: Task) {
    edit_tasks(store, |list| list.prepend(task));
}

/// Update a task in the store by ID
pub fn store_update_task(store: &BoardStore, updated: Task) {
    edit_tasks(store, |list| {
        list.replace(updated);
    });
}

/// Remove a task from the store by ID
pub fn store_remove_task(store: &BoardStore, id: &TaskId) {
    edit_tasks(store, |list| list.remove(id));
}

pub fn store_set_error(store: &BoardStore, message: Option<String>) {
    store.error().try_set(message);
}

pub fn store_set_loading(store: &BoardStore, loading: bool) {
    store.loading().try_set(loading);
}
