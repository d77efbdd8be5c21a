//! Task Board Component
//!
//! Main view for a signed-in user: add form, task list, logout.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use supatodo_core::auth::sign_out;
use supatodo_core::board::load_tasks;

use super::{LoadingSpinner, TaskForm, TaskRow};
use crate::context::use_app_context;
use crate::store::{
    store_set_error, store_set_loading, store_set_tasks, BoardState, BoardStateStoreFields,
};

#[component]
pub fn TaskBoard() -> impl IntoView {
    let ctx = use_app_context();
    let store = Store::new(BoardState::default());
    provide_context(store);

    // Reload whenever the signed-in user changes
    let user_id = Memo::new(move |_| ctx.session().map(|s| s.user_id));
    Effect::new(move |_| {
        let user = user_id.get();
        let session = ctx.session_untracked();
        let tasks = ctx.tasks();
        tracing::debug!(?user, "loading todos");

        store_set_loading(&store, true);
        spawn_local(async move {
            match load_tasks(tasks.as_ref(), session.as_ref()).await {
                Ok(loaded) => store_set_tasks(&store, loaded),
                Err(err) => store_set_error(&store, Some(err.to_string())),
            }
            store_set_loading(&store, false);
        });
    });

    let on_logout = move |_| {
        let auth = ctx.auth();
        spawn_local(async move { sign_out(auth.as_ref()).await });
    };

    let user_label = move || {
        ctx.session().map(|s| match s.email {
            Some(email) if !s.is_anonymous => email,
            _ => "Guest".to_string(),
        })
    };

    view! {
        <div class="board">
            <header class="board-header">
                <h1>"Supatodo"</h1>
                <span class="board-user">{user_label}</span>
                <button class="logout-btn" on:click=on_logout>"Logout"</button>
            </header>

            <TaskForm />

            {move || store.error().get().map(|message| view! {
                <p class="board-error">{message}</p>
            })}

            {move || {
                if store.loading().get() {
                    view! { <LoadingSpinner label="Loading todos..." /> }.into_any()
                } else if store.tasks().with(|tasks| tasks.is_empty()) {
                    view! { <p class="board-empty">"No todos yet. Add one above!"</p> }.into_any()
                } else {
                    view! {
                        <ul class="task-list">
                            <For
                                each=move || store.tasks().get()
                                key=|task| (task.id.clone(), task.is_complete)
                                children=|task| view! { <TaskRow task=task /> }
                            />
                        </ul>
                    }
                    .into_any()
                }
            }}

            <p class="task-count">
                {move || {
                    let (done, total) = store.tasks().with(|tasks| {
                        (tasks.iter().filter(|t| t.is_complete).count(), tasks.len())
                    });
                    format!("{done} of {total} done")
                }}
            </p>
        </div>
    }
}
