use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::app::app;
use crate::audit::AuditLog;
use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::Store;
use crate::state::AppState;

pub fn build_state(config: &AppConfig, store: Arc<dyn Store>) -> AppState {
    AppState::new(
        store,
        TokenKeys::new(&config.security.secret),
        AuditLog::in_dir(&config.logging.audit_dir),
        config.database.query_timeout(),
    )
}

/// Bind the configured port and serve until Ctrl-C.
pub async fn serve(config: &AppConfig, store: Arc<dyn Store>) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.logging.audit_dir).with_context(|| {
        format!(
            "failed to create audit directory {}",
            config.logging.audit_dir.display()
        )
    })?;

    let state = build_state(config, store);
    info!(path = %state.audit.path().display(), "Writing audit log");

    let router = app(state, config.security.enable_cors);

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://localhost:{}", config.server.port);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
