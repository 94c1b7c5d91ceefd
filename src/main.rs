use std::sync::Arc;

use cityscope::{AppState, cache::CacheManager, config::Config, db, providers::Providers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cityscope=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;
    for provider in config.missing_keys() {
        tracing::warn!(provider, "no API key configured; calls to this provider will fail");
    }

    let http = reqwest::Client::builder().user_agent("cityscope/0.1").build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let cache = CacheManager::new(db);

    let state = Arc::new(AppState { cache, providers: Providers::from_config(http, &config) });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, cityscope::router(state)).await?;

    Ok(())
}
