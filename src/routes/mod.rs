pub mod activity;
pub mod assets;
pub mod graphql;
pub mod home;
pub mod profile;
pub mod revalidations;
pub mod search;
pub mod thread;
pub mod views;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router with state attached.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/assets/{*path}", get(assets::serve))
        .merge(thread::router())
        .merge(search::router())
        .merge(profile::router())
        .merge(activity::router())
        .merge(revalidations::router())
        .merge(graphql::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
