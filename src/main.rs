use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sentimentscribe_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{RecommendationEngine, ReqwestTransport},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sentimentscribe_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if config.tmdb_api_key.is_none() {
        tracing::warn!("TMDB_API_KEY is not set; movie recommendations will fail");
    }
    if config.song_api_url.is_none() {
        tracing::warn!("SONG_API_URL is not set; song recommendations will fail");
    }

    let transport = ReqwestTransport::new(config.http_timeout())
        .context("Failed to build HTTP client")?;
    let engine = RecommendationEngine::from_config(&config, Arc::new(transport));
    let app = create_router(Arc::new(AppState::new(engine)));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
