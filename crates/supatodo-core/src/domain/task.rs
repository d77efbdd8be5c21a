//! Task Entity
//!
//! A personal to-do row owned by one user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::entity::{DomainError, DomainResult, Entity};
use super::session::Session;

/// Server-assigned task identifier.
///
/// The `todos` table may use a bigint or a uuid key, so both JSON numbers and
/// strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => TaskId(n.to_string()),
            Raw::Text(s) => TaskId(s),
        })
    }
}

/// A to-do row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owner of the row
    pub user_id: String,
    /// Task text content
    pub task: String,
    /// Completion status
    pub is_complete: bool,
    /// Creation time, newest rows are shown first
    #[serde(alias = "created_at")]
    pub inserted_at: DateTime<Utc>,
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Insert payload for a new task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub task: String,
    pub user_id: String,
}

impl NewTask {
    /// Build an insert for `session`'s user, trimming the text.
    pub fn for_session(text: &str, session: &Session) -> DomainResult<Self> {
        let task = text.trim();
        if task.is_empty() {
            return Err(DomainError::InvalidInput("task text is empty".to_string()));
        }
        Ok(Self {
            task: task.to_string(),
            user_id: session.user_id.clone(),
        })
    }
}
