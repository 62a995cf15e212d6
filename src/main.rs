mod commands;
mod config;
mod dispatch;
mod handlers;
mod platform;
mod providers;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatch::Dispatch;
use crate::providers::{NewsClient, WeatherClient};
use crate::store::MessageStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,weatherbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Weather API: {}", config.weather.base_url);
    info!("  News API: {} (country={})", config.news.base_url, config.news.country);
    info!("  Database: {}", config.storage.database_path.display());
    info!("  Max concurrent handlers: {}", config.dispatch.max_concurrent);

    let store = MessageStore::open(&config.storage.database_path)?;
    info!("  Stored messages: {}", store.count_messages().await?);
    if let Some(last) = store.list_messages(1).await?.first() {
        info!("  Last message received: {}", last.created_at);
    }
    let weather = WeatherClient::new(config.weather.clone())?;
    let news = NewsClient::new(config.news.clone())?;

    let dispatch = Arc::new(Dispatch::new(
        store,
        Arc::new(weather),
        Arc::new(news),
        config.images.clone(),
        config.dispatch.max_concurrent,
    ));

    let bot = teloxide::Bot::new(&config.telegram.bot_token);

    info!("Bot is starting...");
    platform::telegram::run(dispatch, bot).await?;

    Ok(())
}
