use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use furfect_db::Database;
use furfect_db::models::{ChatMessageRow, format_timestamp, parse_timestamp};
use furfect_types::events::{ChatEvent, ChatMessagePayload};
use furfect_types::media::{DEFAULT_AVATAR, InlineImage, stored_image_uri};

use crate::registry::ConnectionRegistry;

const ANONYMOUS_NAME: &str = "Anonymous";

/// An incoming chat message, as received from a client.
#[derive(Debug, Clone)]
pub struct ChatSubmission {
    /// Originating connection, told about failures. `None` for
    /// submissions that did not come from a socket.
    pub connection_id: Option<Uuid>,
    pub sender: String,
    pub message: Option<String>,
    /// Inline image as a data URI
    pub image: Option<String>,
}

/// Cheap, cloneable entry point into the relay worker.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::UnboundedSender<ChatSubmission>,
}

impl RelayHandle {
    pub fn submit(&self, submission: ChatSubmission) -> Result<()> {
        self.tx
            .send(submission)
            .map_err(|_| anyhow!("chat relay worker has stopped"))
    }
}

/// Persist-then-broadcast pipeline for the single chat room.
///
/// All submissions funnel through one worker task, so messages are broadcast
/// in exactly the order they were persisted.
pub struct ChatRelay {
    db: Arc<Database>,
    registry: ConnectionRegistry,
}

impl ChatRelay {
    pub fn new(db: Arc<Database>, registry: ConnectionRegistry) -> Self {
        Self { db, registry }
    }

    /// Start the worker on the current runtime.
    pub fn spawn(self) -> RelayHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(rx));
        RelayHandle { tx }
    }

    async fn run(self, mut rx: mpsc::UnboundedReceiver<ChatSubmission>) {
        while let Some(submission) = rx.recv().await {
            let origin = submission.connection_id;
            if let Err(e) = self.relay(submission).await {
                error!("Chat message error: {:#}", e);
                if let Some(conn_id) = origin {
                    self.registry
                        .send_to(
                            conn_id,
                            ChatEvent::Error {
                                message: "Message could not be delivered".to_string(),
                            },
                        )
                        .await;
                }
            }
        }
        debug!("Chat relay worker stopped");
    }

    /// Resolve the sender, decode the image, persist, then broadcast.
    pub async fn relay(&self, submission: ChatSubmission) -> Result<ChatMessagePayload> {
        let lookup = submission.sender.trim().to_lowercase();
        let user = self
            .db
            .run(move |db| db.get_user_by_email(&lookup))
            .await
            .context("sender lookup failed")?;

        let (name, profile) = match &user {
            Some(user) => (
                user.display_name(),
                stored_image_uri(
                    user.profile_image.as_deref(),
                    user.profile_image_type.as_deref(),
                )
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            ),
            None => (ANONYMOUS_NAME.to_string(), DEFAULT_AVATAR.to_string()),
        };

        let image = match submission.image.as_deref() {
            Some(uri) if !uri.is_empty() => {
                Some(InlineImage::from_data_uri(uri).context("bad inline image")?)
            }
            _ => None,
        };

        let timestamp = Utc::now();
        let row = ChatMessageRow {
            id: Uuid::new_v4().to_string(),
            sender: submission.sender,
            name,
            profile,
            message: submission.message.unwrap_or_default(),
            image_type: image.as_ref().map(|i| i.content_type.clone()),
            image: image.map(|i| i.data),
            created_at: format_timestamp(timestamp),
        };

        let row = self
            .db
            .run(move |db| {
                db.insert_chat_message(&row)?;
                Ok(row)
            })
            .await
            .context("persisting chat message failed")?;

        let payload = ChatMessagePayload {
            image: stored_image_uri(row.image.as_deref(), row.image_type.as_deref()),
            sender: row.sender,
            name: row.name,
            profile: row.profile,
            message: row.message,
            timestamp,
        };

        let delivered = self
            .registry
            .broadcast(&ChatEvent::ChatMessage(payload.clone()))
            .await;
        debug!("Relayed chat message from {} to {} connections", payload.sender, delivered);

        Ok(payload)
    }
}

/// Persisted room history, oldest first, with images re-encoded.
pub async fn history(db: &Arc<Database>) -> Result<Vec<ChatMessagePayload>> {
    let rows = db.run(|db| db.list_chat_messages()).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let timestamp = parse_timestamp(&row.created_at).unwrap_or_else(|| {
                warn!("Corrupt created_at '{}' on chat message '{}'", row.created_at, row.id);
                chrono::DateTime::default()
            });
            let profile = if row.profile.starts_with("data:") {
                row.profile
            } else {
                DEFAULT_AVATAR.to_string()
            };
            ChatMessagePayload {
                image: stored_image_uri(row.image.as_deref(), row.image_type.as_deref()),
                sender: row.sender,
                name: row.name,
                profile,
                message: row.message,
                timestamp,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use furfect_db::models::UserRow;

    fn seeded_db() -> Arc<Database> {
        let db = Database::open_in_memory().unwrap();
        db.create_user(&UserRow {
            id: "u1".into(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "".into(),
            password: "hash".into(),
            profile_image: Some(vec![7, 7, 7]),
            profile_image_type: Some("image/png".into()),
            pet_state: None,
            created_at: format_timestamp(Utc::now()),
        })
        .unwrap();
        Arc::new(db)
    }

    fn submission(sender: &str, text: &str) -> ChatSubmission {
        ChatSubmission {
            connection_id: None,
            sender: sender.into(),
            message: Some(text.into()),
            image: None,
        }
    }

    fn payload_of(event: ChatEvent) -> ChatMessagePayload {
        match event {
            ChatEvent::ChatMessage(payload) => payload,
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn resolves_known_sender() {
        let registry = ConnectionRegistry::new();
        let relay = ChatRelay::new(seeded_db(), registry);

        let payload = relay.relay(submission("Ada@Example.com", "hi")).await.unwrap();
        assert_eq!(payload.name, "Ada");
        assert_eq!(payload.profile, "data:image/png;base64,BwcH");
        assert_eq!(payload.sender, "Ada@Example.com");
        assert!(payload.image.is_none());
    }

    #[tokio::test]
    async fn unknown_sender_is_anonymous() {
        let relay = ChatRelay::new(seeded_db(), ConnectionRegistry::new());

        let payload = relay.relay(submission("ghost@example.com", "boo")).await.unwrap();
        assert_eq!(payload.name, "Anonymous");
        assert_eq!(payload.profile, DEFAULT_AVATAR);
    }

    #[tokio::test]
    async fn image_is_stored_and_reencoded() {
        let db = seeded_db();
        let relay = ChatRelay::new(db.clone(), ConnectionRegistry::new());

        let mut sub = submission("ada@example.com", "");
        sub.image = Some("data:image/gif;base64,AQID".into());
        let payload = relay.relay(sub).await.unwrap();
        assert_eq!(payload.image.as_deref(), Some("data:image/gif;base64,AQID"));

        let stored = db.list_chat_messages().unwrap();
        assert_eq!(stored[0].image.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(stored[0].image_type.as_deref(), Some("image/gif"));
    }

    #[tokio::test]
    async fn worker_broadcasts_in_persisted_order_to_everyone() {
        let db = seeded_db();
        let registry = ConnectionRegistry::new();
        let (origin, mut rx_origin) = registry.register().await;
        let (_other, mut rx_other) = registry.register().await;
        let handle = ChatRelay::new(db.clone(), registry).spawn();

        for text in ["first", "second", "third"] {
            let mut sub = submission("ada@example.com", text);
            sub.connection_id = Some(origin);
            handle.submit(sub).unwrap();
        }

        for rx in [&mut rx_origin, &mut rx_other] {
            let received: Vec<String> = vec![
                payload_of(rx.recv().await.unwrap()).message,
                payload_of(rx.recv().await.unwrap()).message,
                payload_of(rx.recv().await.unwrap()).message,
            ];
            assert_eq!(received, vec!["first", "second", "third"]);
        }

        let persisted: Vec<String> = history(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.message)
            .collect();
        assert_eq!(persisted, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn bad_image_is_reported_to_originator_only() {
        let registry = ConnectionRegistry::new();
        let (origin, mut rx_origin) = registry.register().await;
        let (_other, mut rx_other) = registry.register().await;
        let db = seeded_db();
        let handle = ChatRelay::new(db.clone(), registry).spawn();

        let mut sub = submission("ada@example.com", "look");
        sub.connection_id = Some(origin);
        sub.image = Some("not-a-data-uri".into());
        handle.submit(sub).unwrap();

        match rx_origin.recv().await.unwrap() {
            ChatEvent::Error { .. } => {}
            other => panic!("expected error event, got {:?}", other),
        }
        assert!(rx_other.try_recv().is_err());
        assert!(db.list_chat_messages().unwrap().is_empty());
    }
}
