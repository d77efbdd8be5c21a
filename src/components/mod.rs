//! UI Components
//!
//! Leptos components for the login screen and the task board.

mod auth_form;
mod delete_confirm_button;
mod loading_spinner;
mod task_board;
mod task_form;
mod task_row;

pub use auth_form::AuthForm;
pub use delete_confirm_button::DeleteConfirmButton;
pub use loading_spinner::LoadingSpinner;
pub use task_board::TaskBoard;
pub use task_form::TaskForm;
pub use task_row::TaskRow;
