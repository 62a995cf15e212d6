use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, NewsProvider, ProviderError};
use crate::config::NewsConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct TopHeadlinesResponse {
    #[serde(default)]
    articles: Option<Vec<RawArticle>>,
}

// NewsAPI sends explicit nulls for missing text fields.
#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

impl From<RawArticle> for NewsItem {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
        }
    }
}

/// NewsAPI top-headlines client
pub struct NewsClient {
    client: reqwest::Client,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(config: NewsConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            config,
        })
    }

    async fn top_headlines(&self) -> Result<Vec<NewsItem>, ProviderError> {
        let url = format!("{}/top-headlines", self.config.base_url.trim_end_matches('/'));

        debug!("Requesting top headlines for country '{}'", self.config.country);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("country", self.config.country.as_str()),
                ("apiKey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_headlines(&body)
    }
}

#[async_trait]
impl NewsProvider for NewsClient {
    async fn random_headline(&self) -> Result<NewsItem, ProviderError> {
        let headlines = self.top_headlines().await?;
        pick_uniform(headlines)?.ok_or(ProviderError::Empty)
    }
}

fn parse_headlines(body: &str) -> Result<Vec<NewsItem>, ProviderError> {
    let parsed: TopHeadlinesResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    Ok(parsed
        .articles
        .unwrap_or_default()
        .into_iter()
        .map(NewsItem::from)
        .collect())
}

/// Take one element chosen uniformly at random, or `None` if `items` is empty.
pub(crate) fn pick_uniform<T>(mut items: Vec<T>) -> Result<Option<T>, ProviderError> {
    if items.is_empty() {
        return Ok(None);
    }
    let index = random_below(items.len() as u64)? as usize;
    Ok(Some(items.swap_remove(index)))
}

/// Uniform integer in `0..bound` using rejection sampling over OS randomness.
fn random_below(bound: u64) -> Result<u64, ProviderError> {
    random_below_from(bound, getrandom::getrandom)
}

fn random_below_from<F>(bound: u64, mut fill: F) -> Result<u64, ProviderError>
where
    F: FnMut(&mut [u8]) -> Result<(), getrandom::Error>,
{
    let zone = u64::MAX - (u64::MAX % bound);
    loop {
        let mut bytes = [0u8; 8];
        fill(&mut bytes).map_err(|e| ProviderError::Entropy(e.to_string()))?;
        let value = u64::from_le_bytes(bytes);
        if value < zone {
            return Ok(value % bound);
        }
    }
}
