use async_graphql::*;

use crate::actions;
use crate::graphql::types::{
    AddReplyInput, CreateThreadInput, ThreadNode, UpdateUserInput, UserNode,
};
use crate::revalidate::DynRevalidate;
use crate::threads::{DynThreadRepository, PopulatedThread, Thread, ThreadId};
use crate::users::{DynUserRepository, UserId};
use crate::validation::{CommentForm, ProfileForm, ThreadForm};

/// A freshly written thread has no populated replies yet; resolve its
/// author so the response has the same shape as every other thread.
async fn with_author(threads: &DynThreadRepository, thread: Thread) -> Result<ThreadNode> {
    match actions::fetch_thread(threads.as_ref(), &thread.id).await? {
        Some(populated) => Ok(ThreadNode::from(PopulatedThread {
            replies: Vec::new(),
            ..populated
        })),
        None => Err(Error::new(format!("Thread {} disappeared", thread.id))),
    }
}

/// GraphQL Mutation root
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create or update a profile keyed by auth-provider id
    async fn update_user(&self, ctx: &Context<'_>, input: UpdateUserInput) -> Result<UserNode> {
        let users = ctx.data::<DynUserRepository>()?;
        let revalidator = ctx.data::<DynRevalidate>()?;

        let form = ProfileForm {
            external_id: input.external_id,
            username: input.username,
            name: input.name,
            bio: input.bio.unwrap_or_default(),
            image: input.image.unwrap_or_default(),
        };

        let user =
            actions::update_user(users.as_ref(), revalidator.as_ref(), form, &input.path).await?;
        Ok(user.into())
    }

    /// Post a top-level thread
    async fn create_thread(
        &self,
        ctx: &Context<'_>,
        input: CreateThreadInput,
    ) -> Result<ThreadNode> {
        let threads = ctx.data::<DynThreadRepository>()?;
        let revalidator = ctx.data::<DynRevalidate>()?;

        let form = ThreadForm {
            thread: input.text,
            account_id: input.author_id,
        };

        let thread =
            actions::create_thread(threads.as_ref(), revalidator.as_ref(), form, &input.path)
                .await?;
        with_author(threads, thread).await
    }

    /// Reply to an existing thread
    async fn add_reply(&self, ctx: &Context<'_>, input: AddReplyInput) -> Result<ThreadNode> {
        let threads = ctx.data::<DynThreadRepository>()?;
        let revalidator = ctx.data::<DynRevalidate>()?;

        let reply = actions::add_reply(
            threads.as_ref(),
            revalidator.as_ref(),
            &ThreadId::new(input.thread_id),
            CommentForm { thread: input.text },
            &UserId::new(input.author_id),
            &input.path,
        )
        .await?;
        with_author(threads, reply).await
    }
}
