//! campus-server: HTTP API server for the campus backend.
//!
//! This crate ties the other campus crates into a running application:
//!
//! - Axum-based HTTP API for students, faculties, and avatars
//! - The avatar storage subsystem (file store + database row)
//! - Graceful shutdown via signal handling

pub mod avatars;
pub mod context;
pub mod error;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use campus_core::config::Config;
use campus_core::{Error, Result};

use crate::avatars::{AvatarCatalog, AvatarService, AvatarStore};
use crate::context::AppContext;

/// Start the campus server.
///
/// This is the main entry point. It initializes the database, constructs the
/// [`AppContext`], and serves the HTTP API until a shutdown signal arrives.
pub async fn start(config: Config) -> Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    // Initialize database.
    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let db = campus_db::pool::init_pool(&db_str, config.server.pool_size)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    // Avatar subsystem: the storage root comes from config and is fixed for
    // the lifetime of the process.
    let store = AvatarStore::new(config.avatars.dir.clone());
    let avatars = Arc::new(AvatarService::new(store, db.clone()));
    let catalog = Arc::new(AvatarCatalog::new(db.clone()));

    let ctx = AppContext {
        db,
        config: Arc::new(config.clone()),
        avatars,
        catalog,
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid server address: {e}")))?;

    let app = router::build_router(ctx);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
