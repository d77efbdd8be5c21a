//! Supabase Backend
//!
//! HTTP clients for a hosted Supabase project: GoTrue for auth and
//! PostgREST for the `todos` table.

mod auth;
mod config;
mod storage;
mod tasks;
mod wire;

#[cfg(test)]
mod tests;

pub use auth::{SupabaseAuth, REFRESH_MARGIN_SECS};
pub use config::{ConfigError, SupabaseConfig, ANON_KEY_VAR, REDIRECT_VAR, URL_VAR};
pub use storage::{MemorySessionStorage, SessionStorage};
pub use tasks::{SupabaseTasks, TODOS_TABLE};
