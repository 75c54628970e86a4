use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};

use crate::actions::{self, PROFILE_EDIT_PATH};
use crate::error::{AppError, AppResult};
use crate::routes::home::Html;
use crate::routes::views::{ThreadView, UserCardView};
use crate::state::AppState;
use crate::validation::ProfileForm;

#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct ProfileTemplate {
    pub user: UserCardView,
    pub bio: String,
    pub threads: Vec<ThreadView>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{external_id}", get(profile_page))
        .route(PROFILE_EDIT_PATH, post(edit_profile))
}

async fn profile_page(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> AppResult<Html<ProfileTemplate>> {
    let found = actions::fetch_user_threads(state.users.as_ref(), &external_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let bio = found.user.bio.clone();
    Ok(Html(ProfileTemplate {
        user: found.user.into(),
        bio,
        threads: found.threads.into_iter().map(ThreadView::from).collect(),
    }))
}

async fn edit_profile(
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let user = actions::update_user(
        state.users.as_ref(),
        state.revalidator.as_ref(),
        form,
        PROFILE_EDIT_PATH,
    )
    .await?;

    Ok(Redirect::to(&format!("/profile/{}", user.external_id)).into_response())
}
