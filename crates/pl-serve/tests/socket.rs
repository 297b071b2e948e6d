use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures::{SinkExt, Stream, StreamExt};
use pl_events::{Broadcaster, ConnectionRegistry, Notification};
use pl_serve::{app, prepare_database, serve_on, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tower::ServiceExt;

struct Server {
    _dir: TempDir,
    state: AppState,
    addr: std::net::SocketAddr,
}

async fn start() -> Server {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db").to_str().unwrap().to_string();
    prepare_database(&path).unwrap();
    let state = AppState::new(path, Broadcaster::new(ConnectionRegistry::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_on(listener, state.clone()));
    Server {
        _dir: dir,
        state,
        addr,
    }
}

async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..500 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for registry change");
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn post(state: &AppState, body: &Value) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri("/api/player_data")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app(state.clone()).oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn websocket_receives_filtered_pushes_acks_submissions_and_unregisters_on_close() {
    let server = start().await;
    let (mut ws, _) = connect_async(format!("ws://{}/api/ws?data_type=chat", server.addr))
        .await
        .unwrap();
    wait_until(|| server.state.registry().len() == 1).await;

    for (text, category) in [("skip me", "input"), ("gg", "chat")] {
        let status = post(
            &server.state,
            &json!({"player_name": "P1", "dialog_text": text, "data_type": category}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let pushed: Notification = serde_json::from_value(next_json(&mut ws).await).unwrap();
    assert_eq!(pushed.new_data.dialog_text, "gg");
    assert_eq!(pushed.new_data.data_type, "chat");
    assert_eq!(pushed.players, vec!["P1"]);

    let inbound = json!({"player_name": "P2", "dialog_text": "typed", "data_type": "input"});
    ws.send(Message::text(inbound.to_string())).await.unwrap();
    let ack = next_json(&mut ws).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["id"], 3);

    ws.close(None).await.unwrap();
    wait_until(|| server.state.registry().is_empty()).await;
}

#[tokio::test]
async fn websocket_invalid_message_gets_error_reply() {
    let server = start().await;
    let (mut ws, _) = connect_async(format!("ws://{}/api/ws", server.addr))
        .await
        .unwrap();

    let empty_dialog = json!({"player_name": "P1", "dialog_text": "", "data_type": "chat"});
    ws.send(Message::text(empty_dialog.to_string())).await.unwrap();
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "invalid_input");
}

#[tokio::test]
async fn dropped_websocket_is_unregistered() {
    let server = start().await;
    let (ws, _) = connect_async(format!("ws://{}/api/ws?data_type=all", server.addr))
        .await
        .unwrap();
    wait_until(|| server.state.registry().len() == 1).await;

    drop(ws);
    wait_until(|| server.state.registry().is_empty()).await;

    let status = post(
        &server.state,
        &json!({"player_name": "P1", "dialog_text": "nobody listening", "data_type": "chat"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
