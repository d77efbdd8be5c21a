//! Task Row Component
//!
//! One task in the board list.

use leptos::prelude::*;
use leptos::task::spawn_local;
use supatodo_core::board::{remove_task, toggle_task};
use supatodo_core::domain::Task;

use super::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::store::{store_remove_task, store_update_task, use_board_store};

/// A single task row: completion checkbox, text, delete
#[component]
pub fn TaskRow(task: Task) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_board_store();

    let completed = task.is_complete;
    let text = task.task.clone();
    let id = task.id.clone();
    // Mirrors the input so a rejected toggle can snap it back
    let (checked, set_checked) = signal(completed);

    // The list only changes once the backend accepted the change
    let on_toggle = move |_| {
        set_checked.set(!completed);
        let task = task.clone();
        let session = ctx.session_untracked();
        let tasks = ctx.tasks();
        spawn_local(async move {
            match toggle_task(tasks.as_ref(), session.as_ref(), &task).await {
                Ok(updated) => store_update_task(&store, updated),
                Err(_) => {
                    set_checked.try_set(completed);
                }
            }
        });
    };

    let on_delete = Callback::new(move |_: ()| {
        let id = id.clone();
        let session = ctx.session_untracked();
        let tasks = ctx.tasks();
        spawn_local(async move {
            if remove_task(tasks.as_ref(), session.as_ref(), &id).await.is_ok() {
                store_remove_task(&store, &id);
            }
        });
    });

    view! {
        <li class=if completed { "task-row completed" } else { "task-row" }>
            <input type="checkbox" prop:checked=checked on:change=on_toggle />
            <span class="task-text">{text}</span>
            <DeleteConfirmButton button_class="delete-btn" on_confirm=on_delete />
        </li>
    }
}
