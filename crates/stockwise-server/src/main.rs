//! Stockwise Server: application entry point.

use std::time::Duration;

use stockwise_db::DbManager;
use stockwise_server::{AppState, ServerConfig, build_router};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// How often expired sessions are swept from the store.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<(), String> {
    let directive: Directive = "stockwise=info"
        .parse()
        .map_err(|e| format!("invalid log directive: {e}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .json()
        .init();

    info!("Starting Stockwise server...");

    let config = ServerConfig::from_env().map_err(|e| format!("configuration error: {e}"))?;

    let db = DbManager::connect(&config.db)
        .await
        .map_err(|e| format!("database connection failed: {e}"))?;
    stockwise_db::run_migrations(db.client())
        .await
        .map_err(|e| format!("migrations failed: {e}"))?;

    let state = AppState::new(db, &config);

    if let Some(seed) = config.admin.clone() {
        state
            .accounts
            .provision_admin(seed)
            .await
            .map_err(|e| format!("admin provisioning failed: {e}"))?;
    }

    let auth = state.auth.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(e) = auth.purge_expired().await {
                warn!(error = %e, "Session purge failed");
            }
        }
    });

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Stockwise server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
        .map_err(|e| format!("server failed: {e}"))?;

    info!("Stockwise server stopped.");
    Ok(())
}
