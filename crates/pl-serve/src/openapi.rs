use utoipa::OpenApi;

use crate::routes::error::ErrorEnvelope;
use crate::routes::events::PushQuery;
use crate::routes::ingest::SubmitAck;
use crate::routes::players::HistoryQuery;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use pl_core::types::Submission;
use pl_events::types::{Notification, NotificationData, PlayerEvent};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::ingest::submit,
        crate::routes::players::list_players,
        crate::routes::players::player_events,
        crate::routes::events::subscribe,
        crate::routes::events::stream,
    ),
    components(schemas(
        Submission,
        SubmitAck,
        ErrorEnvelope,
        PlayerEvent,
        Notification,
        NotificationData,
        HistoryQuery,
        PushQuery
    ))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
