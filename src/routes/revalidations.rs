use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/revalidations", get(revalidations))
}

/// SSE stream of page paths invalidated by writes
async fn revalidations(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.bus.subscribe()).map(|msg| {
        let event = match msg {
            Ok(path) => Event::default().event("revalidate").data(path),
            Err(e) => {
                tracing::warn!("Revalidation subscriber lagged: {}", e);
                // Missed paths are unknown; tell the client to refresh everything.
                Event::default().event("revalidate").data("*")
            }
        };
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
