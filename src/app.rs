//! Supatodo Frontend App
//!
//! Builds the Supabase clients, starts the auth bootstrap and switches
//! between the loading, login and task views as the session resolves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gloo_timers::future::sleep;

use leptos::prelude::*;
use leptos::task::spawn_local;
use tokio::sync::watch;
use supatodo_core::auth::{AuthBootstrap, BootstrapState, ShellView};
use supatodo_core::repository::TaskStore;
use supatodo_core::supabase::{SupabaseAuth, SupabaseConfig, SupabaseTasks};
use tracing::{debug, error, info, warn};

use crate::components::{AuthForm, LoadingSpinner, TaskBoard};
use crate::context::AppContext;
use crate::session_storage::BrowserSessionStorage;

#[component]
pub fn App() -> impl IntoView {
    match SupabaseConfig::from_build_env() {
        Ok(config) => view! { <Shell config=config /> }.into_any(),
        Err(err) => {
            error!(error = %err, "Supabase configuration missing");
            view! {
                <div class="config-error">
                    <h1>"Supatodo"</h1>
                    <p>{format!("Configuration error: {err}")}</p>
                    <p class="config-hint">
                        "Set SUPABASE_URL and SUPABASE_ANON_KEY when building the app."
                    </p>
                </div>
            }
            .into_any()
        }
    }
}

/// Longest wait between refresh checks
const MAX_REFRESH_WAIT: Duration = Duration::from_secs(60);
/// Back-off after a refresh that failed without ending the session
const REFRESH_RETRY: Duration = Duration::from_secs(10);

/// Keep the stored access token fresh until `running` is cleared.
///
/// Starts once the bootstrap has resolved, so it never races the startup
/// lookup for the same refresh token.
async fn refresh_sessions(
    auth: Arc<SupabaseAuth>,
    mut states: watch::Receiver<BootstrapState>,
    running: Arc<AtomicBool>,
) {
    if states.wait_for(BootstrapState::is_resolved).await.is_err() {
        return;
    }
    while running.load(Ordering::SeqCst) {
        let wait = auth
            .refresh_due_in()
            .map_or(MAX_REFRESH_WAIT, |due| due.min(MAX_REFRESH_WAIT));
        sleep(wait).await;
        if !running.load(Ordering::SeqCst) {
            break;
        }
        match auth.refresh_if_due().await {
            Ok(session) => debug!(signed_in = session.is_some(), "session refresh check"),
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                sleep(REFRESH_RETRY).await;
            }
        }
    }
}

/// Page origin, used as the confirmation e-mail landing page by default
fn current_origin() -> Option<String> {
    web_sys::window().and_then(|window| window.location().origin().ok())
}

#[component]
fn Shell(config: SupabaseConfig) -> impl IntoView {
    let email_redirect_to = config.email_redirect_to.clone().or_else(current_origin);
    info!(project = %config.url, "starting");

    let auth = Arc::new(SupabaseAuth::new(
        config.clone(),
        Box::new(BrowserSessionStorage::default()),
    ));
    let tasks: Arc<dyn TaskStore> = Arc::new(SupabaseTasks::new(config));
    let bootstrap =
        Arc::new(AuthBootstrap::new(auth.clone()).with_email_redirect(email_redirect_to.clone()));

    let refresher = auth.clone();
    let (auth_state, set_auth_state) = signal(bootstrap.state());
    provide_context(AppContext::new(auth, tasks, auth_state, email_redirect_to));

    // Mirror the bootstrap state into the signal until either side goes away
    let mut states = bootstrap.watch();
    spawn_local(async move {
        loop {
            let state = states.borrow_and_update().clone();
            if set_auth_state.try_set(state).is_some() {
                break;
            }
            if states.changed().await.is_err() {
                break;
            }
        }
    });

    spawn_local(bootstrap.clone().initialize());
    let refreshing = Arc::new(AtomicBool::new(true));
    spawn_local(refresh_sessions(
        refresher,
        bootstrap.watch(),
        refreshing.clone(),
    ));
    on_cleanup(move || {
        refreshing.store(false, Ordering::SeqCst);
        bootstrap.teardown();
    });

    let shell_view = Memo::new(move |_| auth_state.with(ShellView::of));

    move || match shell_view.get() {
        ShellView::Loading => view! { <LoadingSpinner /> }.into_any(),
        ShellView::Login => view! { <AuthForm /> }.into_any(),
        ShellView::Tasks => view! { <TaskBoard /> }.into_any(),
    }
}
