use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::users::{AuthorSummary, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored post. Top-level threads have no parent; replies point at theirs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub text: String,
    pub author_id: UserId,
    pub parent_id: Option<ThreadId>,
    pub community_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Replies in the order they were attached.
    pub children: Vec<ThreadId>,
}

impl Thread {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewThread {
    pub text: String,
    pub author_id: UserId,
    pub community_id: Option<String>,
}

impl NewThread {
    pub fn new(text: impl Into<String>, author_id: UserId) -> Self {
        Self {
            text: text.into(),
            author_id,
            community_id: None,
        }
    }
}

/// A thread with its author resolved and its replies resolved down to the
/// depth the query asked for. Past that depth `replies` is empty while
/// `thread.children` still lists the reply ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedThread {
    pub thread: Thread,
    pub author: AuthorSummary,
    pub replies: Vec<PopulatedThread>,
}

impl PopulatedThread {
    pub fn reply_count(&self) -> usize {
        self.thread.children.len()
    }
}
