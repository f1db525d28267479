use std::convert::Infallible;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use time::OffsetDateTime;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use crate::handles::StatusState;

/// Streams the status projection, starting with the current one.
pub async fn status_events(
    State(state): State<StatusState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let liveness_timeout = state.liveness_timeout;

    let stream = WatchStream::new(state.arbiter.subscribe()).map(move |snapshot| {
        let status = snapshot.to_status(OffsetDateTime::now_utc(), liveness_timeout);
        let event = Event::default()
            .event("status")
            .json_data(&status)
            .unwrap_or_else(|e| {
                tracing::error!("Error encoding status event: {}", e);
                Event::default()
            });

        Ok::<_, Infallible>(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
