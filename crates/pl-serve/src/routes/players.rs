use crate::routes::error::{map_error, ErrorEnvelope};
use crate::{build_playerlog, AppState};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use pl_core::RequestContext;
use pl_events::{CategoryFilter, PlayerEvent};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, serde::Deserialize, ToSchema, IntoParams)]
pub struct HistoryQuery {
    /// Category to keep; omit or pass `all` for every event.
    data_type: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/players", get(list_players))
        .route("/players/{player_name}/events", get(player_events))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/players",
    responses((status = 200, body = Vec<String>), (status = 500, body = ErrorEnvelope))
)]
pub(crate) async fn list_players(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    let playerlog = match build_playerlog(&state) {
        Ok(playerlog) => playerlog,
        Err(err) => return map_error(&err, &ctx).into_response(),
    };
    match playerlog.events().players() {
        Ok(players) => Json(players).into_response(),
        Err(err) => map_error(&err, &ctx).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/players/{player_name}/events",
    params(("player_name" = String, Path, description = "Player name"), HistoryQuery),
    responses((status = 200, body = Vec<PlayerEvent>), (status = 500, body = ErrorEnvelope))
)]
pub(crate) async fn player_events(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(player_name): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let playerlog = match build_playerlog(&state) {
        Ok(playerlog) => playerlog,
        Err(err) => return map_error(&err, &ctx).into_response(),
    };
    let filter = CategoryFilter::parse(query.data_type.as_deref());
    match playerlog.events().query(&player_name, &filter) {
        Ok(events) => Json(events).into_response(),
        Err(err) => map_error(&err, &ctx).into_response(),
    }
}
