//! Outbound email. Delivery is a black box behind [`Notifier`]; callers
//! decide what a failed send means for them.

use anyhow::Result;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub reply_to: Option<String>,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<()>;
}

/// SMTP relay delivery (STARTTLS on the submission port).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(host: &str, credentials: Option<(String, String)>) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?;
        if let Some((username, password)) = credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }

        info!("SMTP mailer configured for {}", host);
        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        let mut builder = Message::builder()
            .from(mail.from.parse::<Mailbox>()?)
            .to(mail.to.parse::<Mailbox>()?)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN);
        if let Some(reply_to) = mail.reply_to {
            builder = builder.reply_to(reply_to.parse::<Mailbox>()?);
        }

        let message = builder.body(mail.body)?;
        self.transport.send(message).await?;

        debug!("Email sent to {}", mail.to);
        Ok(())
    }
}

/// Used when no SMTP host is configured: every send is logged and treated as
/// delivered.
pub struct DisabledMailer;

#[async_trait]
impl Notifier for DisabledMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        info!(
            "Email not configured, skipping \"{}\" to {}",
            mail.subject, mail.to
        );
        Ok(())
    }
}
