use async_graphql::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::Page;
use crate::threads::PopulatedThread;
use crate::users::{self, AuthorSummary, User, UserWithThreads};

/// A registered user
#[derive(Clone, Debug, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "User")]
pub struct UserNode {
    /// Internal user identifier (UUID)
    pub id: String,

    /// Identifier assigned by the auth provider
    pub external_id: String,

    /// Lowercase unique handle
    pub username: String,

    /// Display name
    pub name: String,

    pub bio: String,

    /// Avatar URL
    pub image: String,

    /// Whether the user has completed a profile save
    pub onboarded: bool,

    pub created_at: DateTime<Utc>,

    /// Ids of top-level threads this user authored, oldest first
    pub thread_ids: Vec<String>,
}

impl From<User> for UserNode {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            external_id: user.external_id,
            username: user.username,
            name: user.name,
            bio: user.bio,
            image: user.image,
            onboarded: user.onboarded,
            created_at: user.created_at,
            thread_ids: user.threads.into_iter().map(|id| id.0).collect(),
        }
    }
}

/// The author fields attached to a thread
#[derive(Clone, Debug, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "Author")]
pub struct AuthorNode {
    pub id: String,
    pub external_id: String,
    pub name: String,
    pub username: String,
    pub image: String,
}

impl From<AuthorSummary> for AuthorNode {
    fn from(author: AuthorSummary) -> Self {
        Self {
            id: author.id.0,
            external_id: author.external_id,
            name: author.name,
            username: author.username,
            image: author.image,
        }
    }
}

/// A post with its author and whatever replies were populated
#[derive(Clone, Debug, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "Thread")]
pub struct ThreadNode {
    /// Unique thread identifier (UUID)
    pub id: String,

    pub text: String,

    /// Parent thread id; absent for top-level threads
    pub parent_id: Option<String>,

    pub community_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub author: AuthorNode,

    /// Number of direct replies, populated or not
    pub reply_count: i32,

    /// Populated replies, oldest first
    pub replies: Vec<ThreadNode>,
}

impl From<PopulatedThread> for ThreadNode {
    fn from(populated: PopulatedThread) -> Self {
        let reply_count = populated.reply_count() as i32;
        let thread = populated.thread;
        Self {
            id: thread.id.0,
            text: thread.text,
            parent_id: thread.parent_id.map(|id| id.0),
            community_id: thread.community_id,
            created_at: thread.created_at,
            author: populated.author.into(),
            reply_count,
            replies: populated.replies.into_iter().map(ThreadNode::from).collect(),
        }
    }
}

/// A user together with their populated top-level threads
#[derive(Clone, Debug, SimpleObject)]
pub struct UserThreads {
    pub user: UserNode,
    pub threads: Vec<ThreadNode>,
}

impl From<UserWithThreads> for UserThreads {
    fn from(value: UserWithThreads) -> Self {
        Self {
            user: value.user.into(),
            threads: value.threads.into_iter().map(ThreadNode::from).collect(),
        }
    }
}

/// One page of threads
#[derive(Clone, Debug, SimpleObject)]
pub struct ThreadPage {
    pub items: Vec<ThreadNode>,

    /// Whether more threads exist past this page
    pub has_more: bool,
}

impl From<Page<PopulatedThread>> for ThreadPage {
    fn from(page: Page<PopulatedThread>) -> Self {
        let page = page.map(ThreadNode::from);
        Self {
            items: page.items,
            has_more: page.has_more,
        }
    }
}

/// One page of users
#[derive(Clone, Debug, SimpleObject)]
pub struct UserPage {
    pub items: Vec<UserNode>,

    /// Whether more users match past this page
    pub has_more: bool,
}

impl From<Page<User>> for UserPage {
    fn from(page: Page<User>) -> Self {
        let page = page.map(UserNode::from);
        Self {
            items: page.items,
            has_more: page.has_more,
        }
    }
}

/// Sort direction for user search, by creation time
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl From<SortOrder> for users::SortOrder {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => users::SortOrder::Asc,
            SortOrder::Desc => users::SortOrder::Desc,
        }
    }
}

/// Input for saving a profile
#[derive(InputObject)]
pub struct UpdateUserInput {
    pub external_id: String,
    pub username: String,
    pub name: String,
    pub bio: Option<String>,
    pub image: Option<String>,

    /// Page the save was made from; only "/profile/edit" is revalidated
    pub path: String,
}

/// Input for posting a top-level thread
#[derive(InputObject)]
pub struct CreateThreadInput {
    pub text: String,

    /// Internal id of the posting user
    pub author_id: String,

    /// Page to revalidate once the thread is stored
    pub path: String,
}

/// Input for replying to a thread
#[derive(InputObject)]
pub struct AddReplyInput {
    pub thread_id: String,
    pub text: String,
    pub author_id: String,

    /// Page to revalidate once the reply is stored
    pub path: String,
}
