use axum::http::StatusCode;
use axum::Json;
use pl_core::error::PersistenceError;
use pl_core::{PlayerLogError, RequestContext};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub correlation_id: Option<String>,
}

pub fn map_error(
    err: &PlayerLogError,
    ctx: &RequestContext,
) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code) = classify(err);
    (
        status,
        Json(ErrorEnvelope {
            code: code.to_string(),
            message: err.to_string(),
            correlation_id: ctx.correlation_id.clone(),
        }),
    )
}

pub fn invalid_input(
    message: String,
    ctx: &RequestContext,
) -> (StatusCode, Json<ErrorEnvelope>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorEnvelope {
            code: "invalid_input".to_string(),
            message,
            correlation_id: ctx.correlation_id.clone(),
        }),
    )
}

pub fn classify(err: &PlayerLogError) -> (StatusCode, &'static str) {
    match err {
        PlayerLogError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        PlayerLogError::Persistence(persistence) => map_persistence_error(persistence),
    }
}

fn map_persistence_error(err: &PersistenceError) -> (StatusCode, &'static str) {
    match err {
        PersistenceError::Open { .. } => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
        PersistenceError::Query { .. }
        | PersistenceError::Transaction { .. }
        | PersistenceError::Decode { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    }
}
