use crate::AppState;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use pl_core::playerlog::Source;
use pl_core::RequestContext;
use pl_events::CategoryFilter;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, serde::Deserialize, ToSchema, IntoParams)]
pub struct PushQuery {
    /// Category to receive; omit or pass `all` for every event.
    data_type: Option<String>,
}

impl PushQuery {
    fn filter(&self) -> CategoryFilter {
        CategoryFilter::parse(self.data_type.as_deref())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(stream))
        .route("/events/subscribe", get(subscribe))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/events/subscribe",
    params(PushQuery),
    responses((status = 200, description = "text/event-stream of Notification payloads"))
)]
pub(crate) async fn subscribe(
    State(state): State<AppState>,
    Query(query): Query<PushQuery>,
) -> Response {
    crate::sse::subscribe(&state, query.filter())
}

#[utoipa::path(
    get,
    path = "/api/ws",
    params(PushQuery),
    responses((status = 101, description = "WebSocket of Notification payloads; inbound text frames are submissions"))
)]
pub(crate) async fn stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<PushQuery>,
) -> impl IntoResponse {
    let filter = query.filter();
    let ctx = RequestContext::new(Source::Socket, ctx.correlation_id);
    ws.on_upgrade(move |socket| crate::socket::handle_socket(socket, state, filter, ctx))
}
