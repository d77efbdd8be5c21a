//! Auth Form Component
//!
//! E-mail/password sign-in and sign-up for users who are not signed in.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use supatodo_core::auth::{submit_credentials, AuthNotice, CredentialMode};

use crate::context::use_app_context;

#[component]
pub fn AuthForm() -> impl IntoView {
    let ctx = use_app_context();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (mode, set_mode) = signal(CredentialMode::default());
    let (pending, set_pending) = signal(false);
    let (notice, set_notice) = signal::<Option<AuthNotice>>(None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let email = email.get_untracked();
        let password = password.get_untracked();
        let mode = mode.get_untracked();
        let auth = ctx.auth();
        let redirect = ctx.email_redirect_to();

        set_pending.set(true);
        set_notice.set(None);
        spawn_local(async move {
            let outcome = submit_credentials(auth.as_ref(), mode, &email, &password, redirect).await;
            // A successful sign-in swaps this form out before we get here
            let _ = set_pending.try_set(false);
            let _ = set_notice.try_set(Some(outcome));
        });
    };

    let submit_label = move || match (pending.get(), mode.get()) {
        (true, _) => "Loading...",
        (false, CredentialMode::SignIn) => "Sign In",
        (false, CredentialMode::SignUp) => "Sign Up",
    };

    view! {
        <div class="auth-container">
            <h1>"Supatodo"</h1>
            <p class="auth-subtitle">
                {move || match mode.get() {
                    CredentialMode::SignIn => "Sign in with your email and password",
                    CredentialMode::SignUp => "Create an account with your email",
                }}
            </p>

            <form class="auth-form" on:submit=on_submit>
                <input
                    type="email"
                    placeholder="Your email"
                    required
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Your password"
                    required
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || pending.get()>
                    {submit_label}
                </button>
            </form>

            <button
                type="button"
                class="link-btn"
                on:click=move |_| {
                    set_mode.update(|m| *m = m.toggled());
                    set_notice.set(None);
                }
            >
                {move || match mode.get() {
                    CredentialMode::SignIn => "Don't have an account? Sign Up",
                    CredentialMode::SignUp => "Already have an account? Sign In",
                }}
            </button>

            {move || notice.get().map(|notice| {
                let class = if notice.is_success() { "auth-notice success" } else { "auth-notice error" };
                view! { <p class=class>{notice.message().to_string()}</p> }
            })}
        </div>
    }
}
