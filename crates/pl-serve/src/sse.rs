use crate::AppState;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{Stream, StreamExt};
use pl_events::{CategoryFilter, Registration};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::info;

/// SSE body for one push connection. Dropping it unregisters the connection.
struct PushStream {
    outbox: UnboundedReceiverStream<String>,
    _registration: Registration,
}

impl Stream for PushStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.outbox
            .poll_next_unpin(cx)
            .map(|message| message.map(|data| Ok(Event::default().data(data))))
    }
}

pub fn subscribe(state: &AppState, filter: CategoryFilter) -> Response {
    let (tx, rx) = mpsc::unbounded_channel();
    let registration = Registration::new(state.registry(), tx, filter.clone());
    info!(conn_id = %registration.id(), %filter, transport = "sse", "push connection opened");

    let stream = PushStream {
        outbox: UnboundedReceiverStream::new(rx),
        _registration: registration,
    };
    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}
