//! WebSocket connection handlers.
//!
//! Each connection is served by one task that owns its `ConnectionState`.
//! Inbound events are applied in arrival order; outbound frames are written
//! by a separate pusher task fed through the connection's channel.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionState, ConversationId, OutboundEvent},
    infrastructure::dto::websocket::{ClientEvent, decode_client_event},
    ui::state::AppState,
    usecase::JoinSpotChatCommand,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this connection
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut connection = state.connect_client_usecase.execute(tx).await;

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!("Received from '{}': {}", connection.id(), text.as_str());
                    dispatch(&state, &mut connection, text.as_str()).await;
                }
                Some(Ok(Message::Ping(_))) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Some(Ok(Message::Close(_))) => {
                    tracing::info!("Connection '{}' requested close", connection.id());
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection.id(), e);
                    break;
                }
                None => break,
            },
            _ = &mut send_task => {
                tracing::debug!("Writer for '{}' stopped", connection.id());
                break;
            }
        }
    }
    send_task.abort();

    let report = state.disconnect_client_usecase.execute(connection).await;
    tracing::debug!("Disconnect cleanup finished: {:?}", report);
}

/// Apply one inbound frame to the connection.
///
/// Failures are answered to this connection only and never close it.
async fn dispatch(state: &AppState, connection: &mut ConnectionState, text: &str) {
    let event = match decode_client_event(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event from '{}': {}", connection.id(), e);
            let error = OutboundEvent::Error {
                message: format!("invalid event: {}", e),
            };
            reply(state, connection, error).await;
            return;
        }
    };

    match event {
        ClientEvent::SetNickname(payload) => {
            state
                .set_nickname_usecase
                .execute(connection, payload.into())
                .await;
        }
        ClientEvent::JoinSpotChat(payload) => match JoinSpotChatCommand::try_from(payload) {
            Ok(command) => {
                state.spot_chat_usecase.join(connection, command).await;
            }
            Err(e) => reply_error(state, connection, e.to_string()).await,
        },
        ClientEvent::LeaveSpotChat => {
            state.spot_chat_usecase.leave(connection).await;
        }
        ClientEvent::ChatMessage(body) => {
            if let Err(e) = state.spot_chat_usecase.send(connection, &body).await {
                reply_error(state, connection, e.to_string()).await;
            }
        }
        ClientEvent::JoinDirectChat(payload) => {
            if let Err(e) = state
                .direct_chat_usecase
                .join(connection, payload.into())
                .await
            {
                reply_direct_error(state, connection, e.to_string()).await;
            }
        }
        ClientEvent::LeaveDirectChat(payload) => match ConversationId::try_from(payload) {
            Ok(conversation_id) => {
                state
                    .direct_chat_usecase
                    .leave(connection, &conversation_id)
                    .await;
            }
            Err(e) => reply_direct_error(state, connection, e.to_string()).await,
        },
        ClientEvent::SendDirectMessage(payload) => {
            if let Err(e) = state
                .direct_chat_usecase
                .send(connection, payload.into())
                .await
            {
                reply_direct_error(state, connection, e.to_string()).await;
            }
        }
    }
}

async fn reply_error(state: &AppState, connection: &ConnectionState, message: String) {
    tracing::warn!("Rejected event from '{}': {}", connection.id(), message);
    reply(state, connection, OutboundEvent::Error { message }).await;
}

async fn reply_direct_error(state: &AppState, connection: &ConnectionState, message: String) {
    tracing::warn!("Rejected direct event from '{}': {}", connection.id(), message);
    reply(state, connection, OutboundEvent::DirectError { message }).await;
}

async fn reply(state: &AppState, connection: &ConnectionState, event: OutboundEvent) {
    if let Err(e) = state.message_pusher.push_to(connection.id(), &event).await {
        tracing::warn!("Failed to reply to '{}': {}", connection.id(), e);
    }
}
