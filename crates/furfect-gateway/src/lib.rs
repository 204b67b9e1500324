//! Realtime chat room: a registry of live connections, a relay worker that
//! persists each message before fanning it out, and the WebSocket loop that
//! ties a socket to both.

pub mod connection;
pub mod registry;
pub mod relay;

pub use registry::ConnectionRegistry;
pub use relay::{ChatRelay, ChatSubmission, RelayHandle};
