use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::actions;
use crate::error::{AppError, AppResult};
use crate::routes::home::Html;
use crate::routes::views::ThreadView;
use crate::state::AppState;
use crate::threads::ThreadId;
use crate::users::UserId;
use crate::validation::{CommentForm, ThreadForm};

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/thread.html")]
pub struct ThreadTemplate {
    pub thread: ThreadView,
    pub viewer: String,
}

#[derive(Template)]
#[template(path = "pages/create_thread.html")]
pub struct CreateThreadTemplate {
    pub account_id: String,
}

// --- Forms ---

#[derive(Deserialize)]
pub struct ViewerQuery {
    pub viewer: Option<String>,
}

#[derive(Deserialize)]
pub struct AccountQuery {
    pub account: Option<String>,
}

/// Reply body plus the internal id of the replying user.
#[derive(Deserialize)]
pub struct ReplyForm {
    pub thread: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/thread/{id}", get(thread_page))
        .route("/thread/{id}/reply", post(reply))
        .route("/create-thread", get(create_thread_form).post(create_thread))
}

// --- Handlers ---

async fn thread_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> AppResult<Html<ThreadTemplate>> {
    let thread = actions::fetch_thread(state.threads.as_ref(), &ThreadId::new(id))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Html(ThreadTemplate {
        thread: thread.into(),
        viewer: query.viewer.unwrap_or_default(),
    }))
}

async fn reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ReplyForm>,
) -> AppResult<Response> {
    if form.account_id.trim().is_empty() {
        return Err(AppError::BadRequest("Account is required".into()));
    }

    let path = format!("/thread/{}", id);
    actions::add_reply(
        state.threads.as_ref(),
        state.revalidator.as_ref(),
        &ThreadId::new(id),
        CommentForm { thread: form.thread },
        &UserId::new(form.account_id.as_str()),
        &path,
    )
    .await?;

    Ok(Redirect::to(&path).into_response())
}

async fn create_thread_form(Query(query): Query<AccountQuery>) -> Html<CreateThreadTemplate> {
    Html(CreateThreadTemplate {
        account_id: query.account.unwrap_or_default(),
    })
}

async fn create_thread(
    State(state): State<AppState>,
    Form(form): Form<ThreadForm>,
) -> AppResult<Response> {
    actions::create_thread(state.threads.as_ref(), state.revalidator.as_ref(), form, "/").await?;
    Ok(Redirect::to("/").into_response())
}
