//! Interactive web chat over WebSocket. Each question runs the same
//! embed → scan → synthesize pipeline as the HTTP and Slack surfaces; the
//! socket stays open across turns but no conversational memory is kept.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use chrono::Utc;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use uuid::Uuid;

use super::protocol::WsIncomingMessage;
use crate::core::errors::AppError;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            continue;
        };
        let Ok(incoming) = serde_json::from_str::<WsIncomingMessage>(&text) else {
            let _ = send_json(
                &mut sender,
                json!({"type": "error", "message": "malformed message"}),
            )
            .await;
            continue;
        };

        if let Err(err) = handle_message(&mut sender, &state, incoming).await {
            let _ = send_json(
                &mut sender,
                json!({"type": "error", "message": err.to_string()}),
            )
            .await;
        }
    }
}

async fn handle_message(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    data: WsIncomingMessage,
) -> Result<(), AppError> {
    if data.msg_type.as_deref() != Some("message") {
        return Ok(());
    }

    let question = data.message.unwrap_or_default();
    if question.trim().is_empty() {
        return Ok(());
    }

    match state.engine.ask(&question, data.top_k).await {
        Ok(answer) => {
            send_json(
                sender,
                json!({
                    "type": "answer",
                    "id": Uuid::new_v4().to_string(),
                    "message": answer.text,
                    "sources": answer.sources,
                    "timestamp": Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        }
        Err(err) => {
            tracing::error!("Answering web chat question failed: {}", err);
            send_json(sender, json!({"type": "error", "message": err.to_string()})).await?;
        }
    }

    send_json(sender, json!({"type": "done"})).await
}

pub async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    payload: Value,
) -> Result<(), AppError> {
    let text = serde_json::to_string(&payload).map_err(AppError::internal)?;
    sender
        .send(Message::Text(text))
        .await
        .map_err(AppError::internal)?;
    Ok(())
}
