use askama::Template;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use crate::actions;
use crate::error::AppResult;
use crate::routes::home::Html;
use crate::routes::views::ThreadView;
use crate::state::AppState;
use crate::users::UserId;

#[derive(Template)]
#[template(path = "pages/activity.html")]
pub struct ActivityTemplate {
    pub replies: Vec<ThreadView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/activity/{user_id}", get(activity_page))
}

/// Replies others left on the user's posts
async fn activity_page(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Html<ActivityTemplate>> {
    let replies = actions::get_activity(state.threads.as_ref(), &UserId::new(user_id)).await?;

    Ok(Html(ActivityTemplate {
        replies: replies.into_iter().map(ThreadView::from).collect(),
    }))
}
