use askama::Template;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::actions;
use crate::error::AppResult;
use crate::pagination::Pagination;
use crate::routes::home::Html;
use crate::routes::views::UserCardView;
use crate::state::AppState;
use crate::users::SearchUsers;

#[derive(Deserialize)]
pub struct SearchQuery {
    /// External id of the searching user; excluded from results.
    pub viewer: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub users: Vec<UserCardView>,
    pub viewer: String,
    pub q: String,
    pub page: u32,
    pub has_more: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search_page))
}

async fn search_page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Html<SearchTemplate>> {
    let viewer = query.viewer.unwrap_or_default();
    let q = query.q.unwrap_or_default();
    let pagination = Pagination::from_parts(query.page, None, state.config.feed.search_page_size);

    let search = SearchUsers::new(viewer.as_str())
        .with_search_text(q.as_str())
        .with_pagination(pagination);
    let page = actions::fetch_users(state.users.as_ref(), &search).await?;

    Ok(Html(SearchTemplate {
        users: page.items.into_iter().map(UserCardView::from).collect(),
        viewer,
        q,
        page: pagination.page,
        has_more: page.has_more,
    }))
}
