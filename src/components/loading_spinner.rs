use leptos::prelude::*;

/// Placeholder while the session is being resolved
#[component]
pub fn LoadingSpinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="loading" role="status">
            <span class="spinner"></span>
            <span class="loading-text">{label.unwrap_or_else(|| "Loading...".to_string())}</span>
        </div>
    }
}
