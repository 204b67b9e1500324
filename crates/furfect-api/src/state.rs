use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;

use furfect_db::Database;
use furfect_gateway::{ChatRelay, ConnectionRegistry, RelayHandle};

use crate::mailer::{Notifier, OutgoingMail};

pub type AppState = Arc<AppStateInner>;

/// Sender identity and limits for outbound mail.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub contact_inbox: String,
    pub timeout: Duration,
}

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub mailer: Arc<dyn Notifier>,
    pub mail: MailSettings,
    pub registry: ConnectionRegistry,
    pub relay: RelayHandle,
}

impl AppStateInner {
    /// Build shared state and start the chat relay worker. Must be called
    /// from within a Tokio runtime.
    pub fn new(db: Arc<Database>, mailer: Arc<dyn Notifier>, mail: MailSettings) -> AppState {
        let registry = ConnectionRegistry::new();
        let relay = ChatRelay::new(db.clone(), registry.clone()).spawn();
        Arc::new(Self {
            db,
            mailer,
            mail,
            registry,
            relay,
        })
    }

    /// Send one email, bounded by the configured mail timeout.
    pub async fn deliver(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        match tokio::time::timeout(self.mail.timeout, self.mailer.send(mail)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("mail send timed out after {:?}", self.mail.timeout)),
        }
    }
}
