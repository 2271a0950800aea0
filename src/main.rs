use anyhow::Context;
use gif_browser::{browser::GifBrowser, config::Config, giphy::GiphyClient, routes, templates, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gif_browser=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(?config, "Configuration loaded");

    // --- GIF Service Client ---
    let client = GiphyClient::from_config(&config)?;
    let browser = GifBrowser::new(Arc::new(client));

    // --- Templates ---
    let templates = templates::create_environment().context("Failed to load page template")?;

    // --- Application State ---
    let state = Arc::new(AppState { browser, templates });

    let app = routes::create_router(state);

    // --- Server Startup ---
    tracing::info!("Server listening on http://{}", config.bind_address);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
