pub mod error;
pub mod events;
pub mod ingest;
pub mod players;

use crate::middleware::correlation::request_context;
use crate::{openapi, AppState};
use axum::middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(ingest::router(state.clone()))
        .merge(players::router(state.clone()))
        .merge(events::router(state))
        .merge(openapi::router())
        .route_layer(middleware::from_fn(request_context));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}
