//! Supatodo Core
//!
//! Layered architecture:
//! - domain: Sessions, tasks and auth change events
//! - auth: Auth service abstraction, startup bootstrap and login actions
//! - repository: Task store abstraction and the in-memory store
//! - board: Task board operations and their user-facing failures
//! - supabase: GoTrue and PostgREST clients

pub mod auth;
pub mod board;
pub mod domain;
pub mod repository;
pub mod supabase;

pub use auth::{AuthBootstrap, AuthService, BootstrapState, ShellView};
pub use board::{BoardError, TaskList};
pub use domain::{Session, Task, TaskId};
pub use repository::TaskStore;
pub use supabase::{SupabaseAuth, SupabaseConfig, SupabaseTasks};
