//! HTTP trigger for syncing Avery transactions into a Notion database.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod main_lib;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = main_lib::build_state(config)?;
    info!(
        "Configuration file at {}",
        state.config.data_dir.join(avery_sync_storage_json::CONFIG_FILE_NAME).display()
    );
    if state.config.avery_auth_key.is_none() {
        tracing::warn!("AVERY_AUTH_KEY is not set; sync requests will be rejected");
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Avery Notion sync server listening on http://{}", addr);

    axum::serve(listener, api::app_router(state)).await?;
    Ok(())
}
