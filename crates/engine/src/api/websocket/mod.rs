//! WebSocket handling for game clients.
//!
//! One connection is one session, bound to the user's membership in the room
//! named by the URL for its whole lifetime.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

mod ws_label;

pub mod error_sanitizer;


use tabletop_domain::{LabelId, PlayerRoom, SessionId, User};
use tabletop_shared::{ClientMessage, ServerMessage};

use self::error_sanitizer::codes;
use super::auth::CurrentUser;
use super::connections::SessionInfo;
use super::http::ApiError;
use crate::app::App;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Upgrade `GET /ws/game/{creator}/{room}` for a member of that room.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app): State<Arc<App>>,
    Path((creator, room)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    let room = app
        .repositories
        .rooms
        .find_by_creator_and_name(&creator, &room)
        .await?
        .ok_or(ApiError::NotFound)?;

    let Some(membership) = app
        .repositories
        .memberships
        .find(user.id(), room.id())
        .await?
    else {
        tracing::warn!(
            user = %user.name(),
            room_id = %room.id(),
            "Refusing socket for non-member"
        );
        return Err(ApiError::Forbidden);
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, app, user, membership)))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, app: Arc<App>, user: User, membership: PlayerRoom) {
    let session_id = SessionId::new();
    let room_id = membership.room_id();

    // Create a bounded channel for sending messages to this client
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    // Bind before reading anything so the session sees its own room's events
    let cancel = match app
        .sessions
        .bind(session_id, user, membership, tx.clone())
        .await
    {
        Ok(cancel) => cancel,
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Failed to bind session");
            return;
        }
    };

    tracing::info!(session_id = %session_id, room_id = %room_id, "WebSocket session established");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Spawn a task to forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages one at a time, in arrival order
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(session_id = %session_id, "Session unbound, closing socket");
                break;
            }
            next = ws_receiver.next() => match next {
                Some(result) => result,
                None => break,
            },
        };

        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &app, session_id).await {
                        if tx.try_send(response).is_err() {
                            tracing::warn!(
                                session_id = %session_id,
                                "Failed to send response, channel full or closed"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id, error = %e, "Failed to parse message");
                    let error = ServerMessage::Error {
                        code: codes::PARSE_ERROR.to_string(),
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = tx.try_send(error);
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up
    app.sessions.unbind(session_id).await;
    send_task.abort();

    tracing::info!(session_id = %session_id, "WebSocket session terminated");
}

/// Dispatch a parsed client message to the appropriate handler.
async fn handle_message(
    msg: ClientMessage,
    app: &App,
    session_id: SessionId,
) -> Option<ServerMessage> {
    tracing::trace!(session_id = %session_id, event = msg.event_name(), "Client event");
    match msg {
        // Connection lifecycle
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        // Labels
        ClientMessage::LabelAdd(data) => ws_label::handle_label_add(app, session_id, data).await,
        ClientMessage::LabelDelete(target) => {
            ws_label::handle_label_delete(app, session_id, LabelId::from_uuid(target.id)).await
        }
        ClientMessage::LabelVisibilitySet(data) => {
            ws_label::handle_label_visibility(
                app,
                session_id,
                LabelId::from_uuid(data.id),
                data.visible,
            )
            .await
        }
        ClientMessage::LabelFilterAdd(id) => {
            ws_label::handle_filter_add(app, session_id, LabelId::from_uuid(id)).await
        }
        ClientMessage::LabelFilterRemove(id) => {
            ws_label::handle_filter_remove(app, session_id, LabelId::from_uuid(id)).await
        }
    }
}

/// Resolve the session behind an inbound event. Events from sessions that are
/// no longer bound are dropped.
async fn bound_session(app: &App, session_id: SessionId, event: &str) -> Option<SessionInfo> {
    match app.sessions.lookup(session_id).await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(session_id = %session_id, event, error = %e, "Dropping event");
            None
        }
    }
}
