use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::actions;
use crate::error::AppResult;
use crate::pagination::Pagination;
use crate::routes::views::ThreadView;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FeedQuery {
    pub page: Option<u32>,
    /// Internal id of the browsing user, carried into the post link.
    pub viewer: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub threads: Vec<ThreadView>,
    pub page: u32,
    pub has_more: bool,
    pub viewer: String,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Html<HomeTemplate>> {
    let pagination = Pagination::from_parts(query.page, None, state.config.feed.page_size);
    let page = actions::fetch_threads(state.threads.as_ref(), pagination).await?;

    Ok(Html(HomeTemplate {
        threads: page.items.into_iter().map(ThreadView::from).collect(),
        page: pagination.page,
        has_more: page.has_more,
        viewer: query.viewer.unwrap_or_default(),
    }))
}
