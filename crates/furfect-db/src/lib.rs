pub mod migrations;
pub mod models;
pub mod queries;


use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

/// Bound applied to each store call made through [`Database::run`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Database {
    conn: Mutex<Connection>,
    timeout: Duration,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self::from_conn(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self::from_conn(conn))
    }

    fn from_conn(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run a blocking store call off the async runtime, bounded by the
    /// configured timeout.
    pub async fn run<F, T>(self: &Arc<Self>, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let timeout = self.timeout;
        match tokio::time::timeout(timeout, self.run_to_completion(f)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("store call timed out after {:?}", timeout)),
        }
    }

    /// Like [`Database::run`] but without the timeout. A timed-out blocking
    /// call still runs to the end, so writes whose outcome must be known
    /// before acting on it go through here.
    pub async fn run_to_completion<F, T>(self: &Arc<Self>, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| anyhow!("store task failed: {}", e))?
    }
}

/// True when the error came from a UNIQUE constraint, e.g. a second signup
/// racing the duplicate-email check.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
