use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pagination::{Pagination, DEFAULT_PAGE_SIZE};
use crate::threads::{PopulatedThread, ThreadId};

/// Internal user identifier, referenced by threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Identity assigned by the auth provider. Never changes after creation.
    pub external_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
    pub onboarded: bool,
    pub created_at: DateTime<Utc>,
    /// Top-level threads this user authored, oldest first.
    pub threads: Vec<ThreadId>,
}

/// Fields written by a profile save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub external_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
}

impl UserProfile {
    pub fn normalized_username(&self) -> String {
        self.username.to_lowercase()
    }
}

/// The slice of a user attached to populated threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub external_id: String,
    pub name: String,
    pub username: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchUsers {
    /// External id of the user searching; never part of the results.
    pub requester_id: String,
    pub search_text: String,
    pub pagination: Pagination,
    pub sort_order: SortOrder,
}

impl SearchUsers {
    pub fn new(requester_id: impl Into<String>) -> Self {
        Self {
            requester_id: requester_id.into(),
            search_text: String::new(),
            pagination: Pagination::new(1, DEFAULT_PAGE_SIZE),
            sort_order: SortOrder::Desc,
        }
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithThreads {
    pub user: User,
    pub threads: Vec<PopulatedThread>,
}
