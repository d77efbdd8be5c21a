//! Delete Confirm Button Component
//!
//! Inline two-step delete: the first click asks, the second confirms.

use leptos::prelude::*;

/// Inline delete confirmation button
///
/// Shows a × button initially. When clicked, shows the prompt with ✓/✗
/// buttons; ✓ runs `on_confirm`, ✗ goes back.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into, default = "Delete?".to_string())] prompt: String,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);

    move || {
        if confirming.get() {
            view! {
                <span class="delete-confirm">
                    <span class="delete-confirm-text">{prompt.clone()}</span>
                    <button
                        class="confirm-btn"
                        aria-label="Confirm delete"
                        on:click=move |_| {
                            set_confirming.set(false);
                            on_confirm.run(());
                        }
                    >
                        "✓"
                    </button>
                    <button
                        class="cancel-btn"
                        aria-label="Cancel delete"
                        on:click=move |_| set_confirming.set(false)
                    >
                        "✗"
                    </button>
                </span>
            }
            .into_any()
        } else {
            view! {
                <button
                    class=button_class.clone()
                    aria-label="Delete"
                    on:click=move |_| set_confirming.set(true)
                >
                    "×"
                </button>
            }
            .into_any()
        }
    }
}
