use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

use furfect_types::events::ChatEvent;

/// Tracks every connection currently in the chat room and fans events out to
/// them. Lives for the process lifetime; nothing here is persisted.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    /// Per-connection outbound channels: conn_id -> sender
    connections: RwLock<HashMap<Uuid, mpsc::UnboundedSender<ChatEvent>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the room. Returns (conn_id, receiver) where the
    /// receiver yields every event addressed to this connection.
    pub async fn register(&self) -> (Uuid, mpsc::UnboundedReceiver<ChatEvent>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.connections.write().await.insert(conn_id, tx);
        (conn_id, rx)
    }

    /// Remove a connection. Returns false if it was already gone.
    pub async fn unregister(&self, conn_id: Uuid) -> bool {
        self.inner.connections.write().await.remove(&conn_id).is_some()
    }

    /// Deliver an event to every registered connection. Connections whose
    /// receiver has been dropped are pruned. Returns the delivery count.
    pub async fn broadcast(&self, event: &ChatEvent) -> usize {
        let mut dead = Vec::new();
        let mut delivered = 0;
        {
            let connections = self.inner.connections.read().await;
            for (conn_id, tx) in connections.iter() {
                if tx.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    dead.push(*conn_id);
                }
            }
        }

        if !dead.is_empty() {
            let mut connections = self.inner.connections.write().await;
            for conn_id in dead {
                debug!("Pruning closed chat connection {}", conn_id);
                connections.remove(&conn_id);
            }
        }

        delivered
    }

    /// Send an event to a single connection.
    pub async fn send_to(&self, conn_id: Uuid, event: ChatEvent) -> bool {
        let connections = self.inner.connections.read().await;
        connections
            .get(&conn_id)
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    pub async fn len(&self) -> usize {
        self.inner.connections.read().await.len()
    }
}
