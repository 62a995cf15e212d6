use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub weather: WeatherConfig,
    pub news: NewsConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default = "default_storage_config")]
    pub storage: StorageConfig,
    #[serde(default = "default_dispatch_config")]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Image URLs sent alongside a weather reading, one per temperature band.
#[derive(Debug, Deserialize, Clone)]
pub struct ImagesConfig {
    #[serde(default = "default_sunny_image")]
    pub sunny: String,
    #[serde(default = "default_warm_image")]
    pub warm: String,
    #[serde(default = "default_cold_image")]
    pub cold: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            sunny: default_sunny_image(),
            warm: default_warm_image(),
            cold: default_cold_image(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DispatchConfig {
    /// Upper bound on handlers running at the same time across all chats.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_sunny_image() -> String {
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRroEkG0Z1tSw9MlJo41mqB-MkoaW8aDjh5cw&usqp=CAU"
        .to_string()
}

fn default_warm_image() -> String {
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcR8CyW7cQ6VNVjG0vrcfuClyzC1IwUgUtw8iF1rAtXBcaQjcrY5axboM1YDoA--KzTjCwI&usqp=CAU"
        .to_string()
}

fn default_cold_image() -> String {
    "https://e7.pngegg.com/pngimages/595/116/png-clipart-winter-smiley-emoji-christmas-emoticon-ice-drawing-cold-thumbnail.png"
        .to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("weatherbot.db")
}

fn default_storage_config() -> StorageConfig {
    StorageConfig {
        database_path: default_db_path(),
    }
}

fn default_max_concurrent() -> usize {
    8
}

fn default_dispatch_config() -> DispatchConfig {
    DispatchConfig {
        max_concurrent: default_max_concurrent(),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Secrets from the environment take precedence over the file.
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(key) = get("OPENWEATHERMAP_API_KEY") {
            self.weather.api_key = key;
        }
        if let Some(key) = get("NEWS_API_KEY") {
            self.news.api_key = key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("telegram.bot_token is empty (set it in the config file or TOKEN)");
        }
        if self.dispatch.max_concurrent == 0 {
            anyhow::bail!("dispatch.max_concurrent must be at least 1");
        }
        Ok(())
    }
}
