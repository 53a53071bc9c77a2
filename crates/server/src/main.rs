use std::sync::Arc;

use anyhow::Context;
use gradebook_server::{
    api::{AppState, create_router},
    config::AppConfig,
    db::init_pool_and_migrate,
    repository::Repositories,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "gradebook.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting gradebook server");
    let config = AppConfig::load(CONFIG_PATH)
        .with_context(|| format!("failed to load config from {CONFIG_PATH}"))?;
    let database_url = config
        .database_url
        .clone()
        .context("database_url is not configured (set it in gradebook.toml or DATABASE_URL)")?;

    let db = init_pool_and_migrate(&database_url)
        .await
        .context("failed to initialize database")?;
    info!(
        grading = ?config.grading.policy,
        protect_frozen = config.results.protect_frozen,
        "services configured"
    );

    let state = AppState::new(Repositories::sea_orm(db), &config);
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!(listen = %config.listen, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping server");
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
