use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as delivered to clients: sender identity resolved and any
/// image re-encoded as a data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub sender: String,
    pub name: String,
    pub profile: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Events sent over the chat socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ChatEvent {
    /// Server confirms the connection joined the room
    #[serde(rename_all = "camelCase")]
    Ready { connection_id: String },

    /// A message was persisted and is being fanned out to the room
    ChatMessage(ChatMessagePayload),

    /// The originator's last message could not be relayed
    Error { message: String },
}

/// Commands sent FROM client TO server over the chat socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ChatCommand {
    /// Post a message to the room. `image` is a data URI. A missing sender
    /// posts anonymously.
    ChatMessage {
        #[serde(default)]
        sender: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        image: Option<String>,
    },
}
