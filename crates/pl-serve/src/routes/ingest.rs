use crate::routes::error::{invalid_input, map_error, ErrorEnvelope};
use crate::{build_playerlog, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use pl_core::types::Submission;
use pl_core::RequestContext;
use serde::Serialize;
use utoipa::ToSchema;

pub const SAVED_MESSAGE: &str = "Data saved successfully";

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitAck {
    message: String,
    id: i64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/player_data", post(submit))
        .route("/submit_data", post(submit))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/player_data",
    request_body = Submission,
    responses(
        (status = 200, body = SubmitAck),
        (status = 400, body = ErrorEnvelope),
        (status = 500, body = ErrorEnvelope),
        (status = 503, body = ErrorEnvelope)
    )
)]
pub(crate) async fn submit(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Response {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return invalid_input(rejection.body_text(), &ctx).into_response(),
    };
    let playerlog = match build_playerlog(&state) {
        Ok(playerlog) => playerlog,
        Err(err) => return map_error(&err, &ctx).into_response(),
    };
    match playerlog.submit(&ctx, submission) {
        Ok(event) => Json(SubmitAck {
            message: SAVED_MESSAGE.to_string(),
            id: event.id,
        })
        .into_response(),
        Err(err) => map_error(&err, &ctx).into_response(),
    }
}
