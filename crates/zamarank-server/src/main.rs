mod api;
mod middleware;
mod scheduler;

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use zamarank_card::Background;
use zamarank_client::{ZamaClient, ZamaClientConfig};

use crate::api::{build_app, AppState};

const KEEPALIVE_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = zamarank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        api_base_url = %config.api_base_url,
        max_pages = config.max_pages,
        "starting zamarank-server"
    );

    let client = ZamaClient::new(&ZamaClientConfig::from_app_config(&config))?;
    let background = Background::load(config.card_background_path.as_deref())?;

    let keepalive_http = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(KEEPALIVE_TIMEOUT_SECS))
        .build()?;
    let _scheduler = scheduler::build_scheduler(&config, keepalive_http).await?;

    let app = build_app(AppState::new(client, background));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Zama helper API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on ctrl-c, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    #[cfg(unix)]
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                () = wait_for_ctrl_c() => {},
                _ = sigterm.recv() => {},
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable; waiting for ctrl-c only");
            wait_for_ctrl_c().await;
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;

    tracing::info!("shutdown signal received; draining connections");
}

/// Never resolves if the ctrl-c handler cannot be installed.
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
