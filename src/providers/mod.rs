pub mod news;
pub mod weather;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;

pub use news::{NewsClient, NewsItem};
pub use weather::{WeatherClient, WeatherReading};

/// Why a provider call produced no usable data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("expected field missing from provider response")]
    MissingField,

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed provider response: {0}")]
    Decode(String),

    #[error("provider returned no items")]
    Empty,

    #[error("random source unavailable: {0}")]
    Entropy(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        // A timeout while reading the body is still a transport failure.
        if e.is_timeout() {
            ProviderError::Transport(e.to_string())
        } else if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherReading, ProviderError>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn random_headline(&self) -> Result<NewsItem, ProviderError>;
}

/// HTTP client shared by a provider, with a whole-request timeout.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}
