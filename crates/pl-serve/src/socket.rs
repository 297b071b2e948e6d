use crate::routes::error::classify;
use crate::{build_playerlog, AppState};
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures::{SinkExt, StreamExt};
use pl_core::types::Submission;
use pl_core::{PlayerLogError, RequestContext};
use pl_events::{CategoryFilter, Registration};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Per-connection loop. Outbound frames come from the registry outbox; inbound
/// text frames are treated as submissions and answered on the same socket.
pub async fn handle_socket(
    stream: WebSocket,
    state: AppState,
    filter: CategoryFilter,
    ctx: RequestContext,
) {
    let (mut sender, mut receiver) = stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let registration = Registration::new(state.registry(), tx.clone(), filter.clone());
    let conn_id = registration.id().clone();
    info!(
        %conn_id,
        %filter,
        transport = "websocket",
        correlation_id = ctx.correlation_id.as_deref().unwrap_or("-"),
        "push connection opened"
    );

    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sender.send(text_message(message)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                let reply = handle_inbound(&state, &ctx, &text);
                let _ = tx.send(reply);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    drop(registration);
    writer.abort();
    info!(%conn_id, "push connection closed");
}

pub(crate) fn handle_inbound(state: &AppState, ctx: &RequestContext, text: &str) -> String {
    let submission: Submission = match serde_json::from_str(text) {
        Ok(submission) => submission,
        Err(err) => {
            warn!(error = %err, "rejected socket message");
            return error_payload("invalid_message", &err.to_string());
        }
    };
    let result = build_playerlog(state).and_then(|playerlog| playerlog.submit(ctx, submission));
    match result {
        Ok(event) => serde_json::json!({ "type": "ack", "id": event.id }).to_string(),
        Err(err) => {
            warn!(error = %err, "socket submission failed");
            error_reply(&err)
        }
    }
}

fn error_reply(err: &PlayerLogError) -> String {
    let (_, code) = classify(err);
    error_payload(code, &err.to_string())
}

fn error_payload(code: &str, message: &str) -> String {
    serde_json::json!({ "type": "error", "code": code, "message": message }).to_string()
}

fn text_message(value: String) -> Message {
    Message::Text(Utf8Bytes::from(value))
}
