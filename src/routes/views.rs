// View structs handed to templates. Times are preformatted.
use chrono::{DateTime, Utc};

use crate::threads::PopulatedThread;
use crate::users::{AuthorSummary, User};

pub struct AuthorView {
    pub id: String,
    pub external_id: String,
    pub name: String,
    pub username: String,
    pub image: String,
}

impl From<AuthorSummary> for AuthorView {
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

impl AuthorView {
    /// Single letter shown when the user has no avatar.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

pub struct ThreadView {
    pub id: String,
    pub parent_id: Option<String>,
    pub text: String,
    pub author: AuthorView,
    pub created_at: String,
    pub reply_count: usize,
    pub replies: Vec<ThreadView>,
}

impl From<PopulatedThread> for ThreadView {
    fn from(populated: PopulatedThread) -> Self {
        let reply_count = populated.reply_count();
        let thread = populated.thread;
        Self {
            id: thread.id.0,
            parent_id: thread.parent_id.map(|id| id.0),
            text: thread.text,
            author: populated.author.into(),
            created_at: format_relative_time(&thread.created_at),
            reply_count,
            replies: populated.replies.into_iter().map(ThreadView::from).collect(),
        }
    }
}

impl ThreadView {
    pub fn reply_label(&self) -> String {
        match self.reply_count {
            1 => "1 reply".to_string(),
            n => format!("{} replies", n),
        }
    }

    /// Link to the thread this one replies to, or the feed for top-level posts.
    pub fn parent_path(&self) -> String {
        match &self.parent_id {
            Some(parent) => format!("/thread/{}", parent),
            None => "/".to_string(),
        }
    }
}

pub struct UserCardView {
    pub id: String,
    pub external_id: String,
    pub username: String,
    pub name: String,
    pub image: String,
}

impl From<User> for UserCardView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            external_id: user.external_id,
            username: user.username,
            name: user.name,
            image: user.image,
        }
    }
}

pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let diff = Utc::now().signed_duration_since(*dt);

    let seconds = diff.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = diff.num_minutes();
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = diff.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = diff.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }

    dt.format("%b %-d, %Y").to_string()
}
