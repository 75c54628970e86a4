use validator::Validate;

use super::ActionError;
use crate::pagination::{Page, Pagination};
use crate::revalidate::Revalidate;
use crate::threads::{NewThread, PopulatedThread, Thread, ThreadId, ThreadRepository};
use crate::users::UserId;
use crate::validation::{CommentForm, ThreadForm};

pub async fn create_thread(
    threads: &dyn ThreadRepository,
    revalidator: &dyn Revalidate,
    form: ThreadForm,
    path: &str,
) -> Result<Thread, ActionError> {
    form.validate()?;

    let new_thread = NewThread::new(form.thread, UserId::new(form.account_id));
    let thread = threads
        .create_thread(new_thread)
        .await
        .map_err(ActionError::wrap("Error Posting Thread"))?;

    revalidator.revalidate(path);
    Ok(thread)
}

pub async fn fetch_threads(
    threads: &dyn ThreadRepository,
    pagination: Pagination,
) -> Result<Page<PopulatedThread>, ActionError> {
    threads
        .list_top_level_threads(pagination)
        .await
        .map_err(ActionError::wrap("Failed to fetch threads"))
}

pub async fn fetch_thread(
    threads: &dyn ThreadRepository,
    id: &ThreadId,
) -> Result<Option<PopulatedThread>, ActionError> {
    threads
        .get_thread_by_id(id)
        .await
        .map_err(ActionError::wrap("Failed to fetch thread"))
}

pub async fn add_reply(
    threads: &dyn ThreadRepository,
    revalidator: &dyn Revalidate,
    thread_id: &ThreadId,
    form: CommentForm,
    author_id: &UserId,
    path: &str,
) -> Result<Thread, ActionError> {
    form.validate()?;

    let reply = threads
        .add_reply(thread_id, &form.thread, author_id)
        .await
        .map_err(ActionError::wrap("Error adding reply"))?;

    revalidator.revalidate(path);
    Ok(reply)
}

pub async fn get_activity(
    threads: &dyn ThreadRepository,
    user_id: &UserId,
) -> Result<Vec<PopulatedThread>, ActionError> {
    threads
        .get_activity(user_id)
        .await
        .map_err(ActionError::wrap("Failed to fetch activity"))
}
