//! Realtime transcription channel
//!
//! One WebSocket per client, authenticated once at handshake time.
//! Protocol: the client sends `transcribe:start`, then streams audio as
//! binary frames; each frame is transcribed standalone (no buffering
//! across frames) and answered with `transcribe:result` or
//! `transcribe:error`. Frames are processed serially in arrival order,
//! so results cannot overtake each other.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, WebSocketUpgrade,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::IntoResponse,
    Extension,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::models::{WsClientEvent, WsServerEvent};
use crate::auth::extractors::{resolve_token, AuthedUser};
use crate::common::{generate_connection_id, ApiError, AppState};

/// Browsers cannot set headers on WebSocket handshakes, so the token is
/// accepted from a `token` query parameter as well as the standard
/// Authorization header.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let token = params
        .get("token")
        .cloned()
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication token".to_string()))?;

    // Authenticate once; an invalid token rejects the whole connection
    // before the upgrade completes.
    let authed = resolve_token(&state, &token).await?;

    info!(user_id = %authed.id, "Transcription channel authenticated");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, authed, state)))
}

async fn handle_socket(mut socket: WebSocket, authed: AuthedUser, state: AppState) {
    let connection_id = generate_connection_id();

    info!(
        user_id = %authed.id,
        connection_id = %connection_id,
        "Transcription channel connected"
    );

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let event: WsClientEvent = match serde_json::from_str(&text) {
                    Ok(e) => e,
                    Err(e) => {
                        warn!(
                            connection_id = %connection_id,
                            error = %e,
                            "Unrecognized channel event"
                        );
                        let _ = send_event(
                            &mut socket,
                            &WsServerEvent::Error {
                                message: "Unrecognized event".to_string(),
                            },
                        )
                        .await;
                        continue;
                    }
                };

                match event {
                    WsClientEvent::Start => {
                        info!(connection_id = %connection_id, "Transcription session started");
                        if send_event(&mut socket, &WsServerEvent::Ready).await.is_err() {
                            break;
                        }
                    }
                    WsClientEvent::Stop => {
                        info!(connection_id = %connection_id, "Transcription session stopped");
                        if send_event(&mut socket, &WsServerEvent::Stopped).await.is_err() {
                            break;
                        }
                    }
                }
            }
            Message::Binary(chunk) => {
                // Each chunk is transcribed standalone; awaiting here
                // serializes calls so results keep arrival order.
                let event = transcribe_chunk(&state, &connection_id, chunk).await;
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
            Message::Ping(_) | Message::Pong(_) => {
                debug!(connection_id = %connection_id, "Heartbeat");
            }
            Message::Close(_) => {
                break;
            }
        }
    }

    info!(
        user_id = %authed.id,
        connection_id = %connection_id,
        "Transcription channel disconnected"
    );
}

async fn transcribe_chunk(
    state: &AppState,
    connection_id: &str,
    chunk: Vec<u8>,
) -> WsServerEvent {
    if chunk.is_empty() {
        return WsServerEvent::Error {
            message: "Empty audio chunk".to_string(),
        };
    }

    // Recorder chunks on this channel are webm; the HTTP endpoint is the
    // one that accepts the full MIME allow-list.
    match state
        .transcription_service
        .transcribe(chunk, "audio/webm")
        .await
    {
        Ok(text) => WsServerEvent::Result { text },
        Err(e) => {
            error!(
                connection_id = %connection_id,
                error = %e,
                "Chunk transcription failed"
            );
            WsServerEvent::Error {
                message: "Failed to transcribe audio".to_string(),
            }
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &WsServerEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json)).await,
        Err(e) => {
            error!(error = %e, "Failed to serialize channel event");
            Ok(())
        }
    }
}
