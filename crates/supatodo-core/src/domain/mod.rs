//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no I/O; only serde and chrono for the data shapes.

mod entity;
mod session;
mod task;

pub use entity::{DomainError, DomainResult, Entity};
pub use session::{AuthChange, AuthEvent, Session};
pub use task::{NewTask, Task, TaskId};
