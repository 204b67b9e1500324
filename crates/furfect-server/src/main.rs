mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use furfect_api::mailer::{DisabledMailer, Notifier, SmtpMailer};
use furfect_api::{AppStateInner, MailSettings};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "furfect=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(furfect_db::Database::open(&config.db_path)?.with_timeout(config.store_timeout));

    let mailer: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => {
            let credentials = smtp.username.clone().zip(smtp.password.clone());
            Arc::new(SmtpMailer::new(&smtp.host, credentials)?)
        }
        None => {
            warn!("FURFECT_SMTP_HOST is not set; outgoing email is disabled");
            Arc::new(DisabledMailer)
        }
    };

    let state = AppStateInner::new(
        db,
        mailer,
        MailSettings {
            from: config.mail_from.clone(),
            contact_inbox: config.contact_inbox.clone(),
            timeout: config.mail_timeout,
        },
    );

    let mut app = furfect_api::router(state, config.max_upload_bytes);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("FurFect Match server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
