use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{error, info, warn};

use furfect_types::events::{ChatCommand, ChatEvent};

use crate::registry::ConnectionRegistry;
use crate::relay::{ChatSubmission, RelayHandle};

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

fn encode(event: &ChatEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to encode chat event: {}", e);
            None
        }
    }
}

/// Drive one chat socket: Connected -> (receive message)* -> Disconnected.
pub async fn handle_connection(socket: WebSocket, registry: ConnectionRegistry, relay: RelayHandle) {
    let (mut sender, mut receiver) = socket.split();

    let (conn_id, mut events_rx) = registry.register().await;
    info!("User connected to chat: {} ({} online)", conn_id, registry.len().await);

    let ready = ChatEvent::Ready {
        connection_id: conn_id.to_string(),
    };
    let Some(ready) = encode(&ready) else {
        registry.unregister(conn_id).await;
        return;
    };
    if sender.send(Message::Text(ready.into())).await.is_err() {
        registry.unregister(conn_id).await;
        return;
    }

    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received.clone();

    // Forward room events -> client, with heartbeat
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                event = events_rx.recv() => {
                    let Some(event) = event else { break };
                    let Some(text) = encode(&event) else { continue };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= 2 {
                            warn!("Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Read commands from client
    let recv_registry = registry.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ChatCommand>(&text) {
                    Ok(ChatCommand::ChatMessage { sender: from, message, image }) => {
                        let submission = ChatSubmission {
                            connection_id: Some(conn_id),
                            sender: from,
                            message,
                            image,
                        };
                        if let Err(e) = relay.submit(submission) {
                            error!("{}: {}", conn_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(
                            "{} bad command: {} -- raw: {}",
                            conn_id,
                            e,
                            text.chars().take(200).collect::<String>()
                        );
                        let rejected = ChatEvent::Error {
                            message: format!("Unrecognized chat command: {}", e),
                        };
                        recv_registry.send_to(conn_id, rejected).await;
                    }
                },
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    registry.unregister(conn_id).await;
    info!("User disconnected from chat: {}", conn_id);
}
