// Web-based portrait studio backed by Google Gemini

use std::sync::Arc;

use anyhow::Context;
use sujit_editor::{web, Config, GeminiGateway, KeySource, Studio};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sujit_editor=info,tower_http=info")),
        )
        .with_timer(fmt::time::uptime())
        .init();

    let config = Config::from_env();
    let keys = KeySource::default();
    if keys.resolve().is_none() {
        warn!("GEMINI_API_KEY is not set; requests will fail until it is");
    }

    let gateway = Arc::new(GeminiGateway::new(&config, keys));
    let studio = Arc::new(Studio::new(gateway, config.progress_tick));
    let app = web::router(studio, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    info!(
        addr = %config.bind,
        image_model = %config.image_model,
        text_model = %config.text_model,
        "server running"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
