//! Repository Layer
//!
//! Task data access abstraction and the in-memory implementation.
//! The Supabase-backed store lives in `crate::supabase`.

mod error;
mod memory;
mod traits;


pub use error::{StoreError, StoreResult};
pub use memory::MemoryTaskStore;
pub use traits::TaskStore;
