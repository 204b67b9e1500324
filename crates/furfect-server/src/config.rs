use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Runtime settings, read from the environment (after `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub store_timeout: Duration,
    pub mail_timeout: Duration,
    pub smtp: Option<SmtpConfig>,
    pub mail_from: String,
    pub contact_inbox: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw.parse().with_context(|| format!("invalid {}: {:?}", name, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let smtp = var("FURFECT_SMTP_HOST").map(|host| SmtpConfig {
            host,
            username: var("FURFECT_SMTP_USER"),
            password: var("FURFECT_SMTP_PASS"),
        });

        let mail_from = var("FURFECT_MAIL_FROM")
            .or_else(|| var("FURFECT_SMTP_USER"))
            .unwrap_or_else(|| "noreply@localhost".into());
        let contact_inbox = var("FURFECT_CONTACT_INBOX").unwrap_or_else(|| mail_from.clone());

        Ok(Self {
            host: var("FURFECT_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed("FURFECT_PORT", 5000)?,
            db_path: var("FURFECT_DB_PATH")
                .unwrap_or_else(|| "furfect.db".into())
                .into(),
            static_dir: var("FURFECT_STATIC_DIR").map(PathBuf::from),
            store_timeout: Duration::from_secs(parsed("FURFECT_STORE_TIMEOUT_SECS", 10)?),
            mail_timeout: Duration::from_secs(parsed("FURFECT_MAIL_TIMEOUT_SECS", 15)?),
            smtp,
            mail_from,
            contact_inbox,
            max_upload_bytes: parsed("FURFECT_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}
