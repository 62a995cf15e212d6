use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, ProviderError, WeatherProvider};
use crate::config::WeatherConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
}

// Both levels are optional: OpenWeatherMap answers unknown cities with
// `{"cod":"404","message":"city not found"}` and no `main` object.
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: Option<MainBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: Option<f64>,
}

/// OpenWeatherMap current-weather client
pub struct WeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReading, ProviderError> {
        let url = format!("{}/weather", self.config.base_url.trim_end_matches('/'));

        debug!("Requesting current weather for '{}'", city);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", self.config.units.as_str()),
            ])
            .send()
            .await?;

        // The temperature field decides success, not the status code: an
        // error body simply lacks it.
        let body = response.text().await?;
        parse_reading(&body)
    }
}

fn parse_reading(body: &str) -> Result<WeatherReading, ProviderError> {
    let parsed: CurrentWeatherResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    parsed
        .main
        .and_then(|m| m.temp)
        .map(|temperature_celsius| WeatherReading {
            temperature_celsius,
        })
        .ok_or(ProviderError::MissingField)
}
