//! Account service API server.

use account_server::{router, AppState, ServerConfig};
use anyhow::Context;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_server=info,account_auth=info,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::load().context("failed to load configuration")?;
    let addr = config.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "invalid listen address, check ACCOUNTS__SERVER__HOST and ACCOUNTS__SERVER__PORT"
        );
        e
    })?;

    let state = AppState::new(config.token_config()).context("failed to initialize auth")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "account server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("account server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
