use async_graphql::*;

use crate::actions;
use crate::graphql::types::{SortOrder, ThreadNode, ThreadPage, UserNode, UserPage, UserThreads};
use crate::pagination::{Pagination, DEFAULT_PAGE_SIZE};
use crate::threads::{DynThreadRepository, ThreadId};
use crate::users::{DynUserRepository, SearchUsers, UserId};

/// GraphQL Query root
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Look up a user by auth-provider id
    async fn user(&self, ctx: &Context<'_>, external_id: String) -> Result<Option<UserNode>> {
        let users = ctx.data::<DynUserRepository>()?;
        let user = actions::fetch_user(users.as_ref(), &external_id).await?;
        Ok(user.map(UserNode::from))
    }

    /// A user with their top-level threads, each with one level of replies
    async fn user_threads(
        &self,
        ctx: &Context<'_>,
        external_id: String,
    ) -> Result<Option<UserThreads>> {
        let users = ctx.data::<DynUserRepository>()?;
        let found = actions::fetch_user_threads(users.as_ref(), &external_id).await?;
        Ok(found.map(UserThreads::from))
    }

    /// Search users other than the requester by username or name
    async fn users(
        &self,
        ctx: &Context<'_>,
        requester_id: String,
        search_text: Option<String>,
        page: Option<u32>,
        page_size: Option<u32>,
        sort_order: Option<SortOrder>,
    ) -> Result<UserPage> {
        let users = ctx.data::<DynUserRepository>()?;
        let search = SearchUsers::new(requester_id)
            .with_search_text(search_text.unwrap_or_default())
            .with_pagination(Pagination::from_parts(page, page_size, DEFAULT_PAGE_SIZE))
            .with_sort_order(sort_order.unwrap_or_default().into());

        let found = actions::fetch_users(users.as_ref(), &search).await?;
        Ok(found.into())
    }

    /// Newest top-level threads
    async fn threads(
        &self,
        ctx: &Context<'_>,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<ThreadPage> {
        let threads = ctx.data::<DynThreadRepository>()?;
        let pagination = Pagination::from_parts(page, page_size, DEFAULT_PAGE_SIZE);
        let found = actions::fetch_threads(threads.as_ref(), pagination).await?;
        Ok(found.into())
    }

    /// A single thread with two levels of replies
    async fn thread(&self, ctx: &Context<'_>, id: String) -> Result<Option<ThreadNode>> {
        let threads = ctx.data::<DynThreadRepository>()?;
        let found = actions::fetch_thread(threads.as_ref(), &ThreadId::new(id)).await?;
        Ok(found.map(ThreadNode::from))
    }

    /// Replies other users made to this user's posts, newest first
    async fn activity(&self, ctx: &Context<'_>, user_id: String) -> Result<Vec<ThreadNode>> {
        let threads = ctx.data::<DynThreadRepository>()?;
        let replies = actions::get_activity(threads.as_ref(), &UserId::new(user_id)).await?;
        Ok(replies.into_iter().map(ThreadNode::from).collect())
    }
}
