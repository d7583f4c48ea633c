//! WebSocket handler for real-time notifications
//!
//! Each socket receives the notifications addressed to the signed-in user
//! as JSON text frames.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::Arc;

use super::{AppState, CurrentUser};
use crate::services::notifications::UserFeed;

pub async fn notifications_stream(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let feed = state.notifier.subscribe_user(user.id);
    ws.on_upgrade(move |socket| handle_notifications_stream(socket, feed))
}

async fn handle_notifications_stream(mut socket: WebSocket, mut feed: UserFeed) {
    tracing::debug!(user = %feed.user_id(), "Notification stream opened");

    loop {
        tokio::select! {
            notification = feed.next() => {
                let Some(notification) = notification else {
                    break;
                };
                let json = match serde_json::to_string(&notification) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::warn!("Failed to encode notification: {}", e);
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) => break,
                    Some(Err(_)) => break,
                    None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!(user = %feed.user_id(), "Notification stream closed");
}
