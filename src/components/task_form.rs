//! New Task Form Component

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use supatodo_core::board::add_task;

use crate::context::use_app_context;
use crate::store::{store_prepend_task, store_set_error, use_board_store};

/// Form for adding a task to the top of the board
#[component]
pub fn TaskForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_board_store();

    let (new_text, set_new_text) = signal(String::new());
    let (adding, set_adding) = signal(false);

    let create_task = move |ev: SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        let session = ctx.session_untracked();
        let tasks = ctx.tasks();

        set_adding.set(true);
        spawn_local(async move {
            match add_task(tasks.as_ref(), session.as_ref(), &text).await {
                Ok(Some(task)) => {
                    store_prepend_task(&store, task);
                    store_set_error(&store, None);
                    set_new_text.set(String::new());
                }
                Ok(None) => {}
                Err(err) => store_set_error(&store, Some(err.to_string())),
            }
            set_adding.set(false);
        });
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            <input
                type="text"
                placeholder="What needs to be done?"
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || adding.get()>"Add"</button>
        </form>
    }
}
