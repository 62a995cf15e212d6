use tracing::warn;

use crate::commands::{CommandKind, WEATHER_KEYWORD};
use crate::config::ImagesConfig;
use crate::providers::{NewsItem, NewsProvider, WeatherProvider};

pub const HELP_TEXT: &str = "Вот список доступных команд:\n\
                             /weather - получить информацию о погоде\n\
                             /news - получить последние новости\n\
                             /help - показать список команд\n\
                             /start - перезапустить бот";

pub const CITY_MISSING_TEXT: &str = "Вы не указали название города. Пожалуйста, введите название города после слова 'погода'.";

pub const INVALID_CITY_TEXT: &str =
    "Неправильно указан город. Пожалуйста, проверьте правильность названия города.";

pub const NEWS_UNAVAILABLE_TEXT: &str =
    "Извините, не удалось получить новости. Пожалуйста, попробуйте позже.";

/// One outbound action for the chat the message came from
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Photo(String),
    /// Text sent as a reply to the inbound message
    ReplyTo(String),
}

/// Temperature band picking the image sent with a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Sunny,
    Warm,
    Cold,
}

impl ImageCategory {
    /// Lower bounds are inclusive: 30.0 is sunny, 10.0 is warm.
    pub fn for_temperature(celsius: f64) -> Self {
        if celsius >= 30.0 {
            ImageCategory::Sunny
        } else if celsius >= 10.0 {
            ImageCategory::Warm
        } else {
            ImageCategory::Cold
        }
    }

    pub fn image_url(self, images: &ImagesConfig) -> &str {
        match self {
            ImageCategory::Sunny => images.sunny.as_str(),
            ImageCategory::Warm => images.warm.as_str(),
            ImageCategory::Cold => images.cold.as_str(),
        }
    }
}

/// Collaborators the handlers call out to
pub struct HandlerContext<'a> {
    pub weather: &'a dyn WeatherProvider,
    pub news: &'a dyn NewsProvider,
    pub images: &'a ImagesConfig,
}

/// Run the handler for `command`. Unrecognized text produces no replies.
pub async fn handle(
    command: &CommandKind,
    sender_name: &str,
    ctx: &HandlerContext<'_>,
) -> Vec<Reply> {
    match command {
        CommandKind::Start => vec![Reply::Text(start_text(sender_name))],
        CommandKind::Help => vec![Reply::Text(HELP_TEXT.to_string())],
        CommandKind::WeatherPrompt => vec![Reply::Text(weather_prompt_text())],
        CommandKind::WeatherLookup { city } => weather_lookup(city, ctx).await,
        CommandKind::News => news(ctx).await,
        CommandKind::Unrecognized => Vec::new(),
    }
}

fn start_text(sender_name: &str) -> String {
    format!(
        "Здравствуйте, {}. Я бот, который предоставляет информацию о погоде, новостях, \n\
         /help для получения списка доступных команд",
        sender_name
    )
}

fn weather_prompt_text() -> String {
    format!(
        "Чтобы узнать погоду, введите ключевые слова \"{}\" и \"название города\"",
        WEATHER_KEYWORD
    )
}

async fn weather_lookup(city: &str, ctx: &HandlerContext<'_>) -> Vec<Reply> {
    let city = city.trim();
    if city.is_empty() {
        return vec![Reply::ReplyTo(CITY_MISSING_TEXT.to_string())];
    }

    // Unknown city and provider outage look the same to the user.
    let reading = match ctx.weather.current(city).await {
        Ok(reading) => reading,
        Err(e) => {
            warn!("Weather lookup for '{}' failed: {}", city, e);
            return vec![Reply::ReplyTo(INVALID_CITY_TEXT.to_string())];
        }
    };

    let temperature = reading.temperature_celsius;
    let image = ImageCategory::for_temperature(temperature).image_url(ctx.images);

    vec![
        Reply::Photo(image.to_string()),
        Reply::ReplyTo(format!(
            "Сейчас погода: {}°C, \n/help - команды",
            format_temperature(temperature)
        )),
    ]
}

/// Whole degrees keep their fractional digit: 22.0 prints as "22.0".
fn format_temperature(celsius: f64) -> String {
    format!("{:?}", celsius)
}

async fn news(ctx: &HandlerContext<'_>) -> Vec<Reply> {
    match ctx.news.random_headline().await {
        Ok(item) => vec![Reply::Text(format_news(&item))],
        Err(e) => {
            warn!("News lookup failed: {}", e);
            vec![Reply::ReplyTo(NEWS_UNAVAILABLE_TEXT.to_string())]
        }
    }
}

fn format_news(item: &NewsItem) -> String {
    format!("{}\n\n{}\n\n{}", item.title, item.description, item.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderError, WeatherReading};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedWeather {
        outcome: Result<WeatherReading, ProviderError>,
        calls: AtomicUsize,
    }

    impl FixedWeather {
        fn new(outcome: Result<WeatherReading, ProviderError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for FixedWeather {
        async fn current(&self, _city: &str) -> Result<WeatherReading, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct FixedNews(Result<NewsItem, ProviderError>);

    #[async_trait]
    impl NewsProvider for FixedNews {
        async fn random_headline(&self) -> Result<NewsItem, ProviderError> {
            self.0.clone()
        }
    }

    fn reading(t: f64) -> Result<WeatherReading, ProviderError> {
        Ok(WeatherReading {
            temperature_celsius: t,
        })
    }

    async fn run(
        command: CommandKind,
        weather: &FixedWeather,
        news: &FixedNews,
    ) -> Vec<Reply> {
        let images = ImagesConfig::default();
        let ctx = HandlerContext {
            weather,
            news,
            images: &images,
        };
        handle(&command, "Ana", &ctx).await
    }

    fn lookup(city: &str) -> CommandKind {
        CommandKind::WeatherLookup {
            city: city.to_string(),
        }
    }

    #[test]
    fn test_image_category_boundaries() {
        assert_eq!(ImageCategory::for_temperature(30.0), ImageCategory::Sunny);
        assert_eq!(ImageCategory::for_temperature(29.999), ImageCategory::Warm);
        assert_eq!(ImageCategory::for_temperature(10.0), ImageCategory::Warm);
        assert_eq!(ImageCategory::for_temperature(9.999), ImageCategory::Cold);
        assert_eq!(ImageCategory::for_temperature(-20.0), ImageCategory::Cold);
        assert_eq!(ImageCategory::for_temperature(41.0), ImageCategory::Sunny);
    }

    #[tokio::test]
    async fn test_start_greets_by_name() {
        let weather = FixedWeather::new(reading(0.0));
        let news = FixedNews(Err(ProviderError::Empty));
        let replies = run(CommandKind::Start, &weather, &news).await;

        assert_eq!(replies.len(), 1);
        match &replies[0] {
            Reply::Text(text) => {
                assert!(text.contains("Здравствуйте, Ana"));
                assert!(text.contains("/help"));
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_help_lists_all_commands() {
        let weather = FixedWeather::new(reading(0.0));
        let news = FixedNews(Err(ProviderError::Empty));
        let replies = run(CommandKind::Help, &weather, &news).await;

        assert_eq!(replies, vec![Reply::Text(HELP_TEXT.to_string())]);
        for cmd in ["/weather", "/news", "/help", "/start"] {
            assert!(HELP_TEXT.contains(cmd));
        }
    }

    #[tokio::test]
    async fn test_weather_prompt_mentions_keyword() {
        let weather = FixedWeather::new(reading(0.0));
        let news = FixedNews(Err(ProviderError::Empty));
        let replies = run(CommandKind::WeatherPrompt, &weather, &news).await;

        assert!(matches!(&replies[..], [Reply::Text(t)] if t.contains("погода")));
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_city_skips_provider() {
        let weather = FixedWeather::new(reading(20.0));
        let news = FixedNews(Err(ProviderError::Empty));
        let replies = run(lookup("   "), &weather, &news).await;

        assert_eq!(replies, vec![Reply::ReplyTo(CITY_MISSING_TEXT.to_string())]);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_warm_reading_sends_image_then_text() {
        let weather = FixedWeather::new(reading(22.5));
        let news = FixedNews(Err(ProviderError::Empty));
        let replies = run(lookup("paris"), &weather, &news).await;

        let images = ImagesConfig::default();
        assert_eq!(
            replies,
            vec![
                Reply::Photo(images.warm.clone()),
                Reply::ReplyTo("Сейчас погода: 22.5°C, \n/help - команды".to_string()),
            ]
        );
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_temperature_keeps_fraction() {
        assert_eq!(format_temperature(22.0), "22.0");
        assert_eq!(format_temperature(22.5), "22.5");
        assert_eq!(format_temperature(-3.0), "-3.0");
    }

    #[tokio::test]
    async fn test_whole_degree_reading_reply() {
        let weather = FixedWeather::new(reading(22.0));
        let news = FixedNews(Err(ProviderError::Empty));
        let replies = run(lookup("paris"), &weather, &news).await;

        assert_eq!(
            replies[1],
            Reply::ReplyTo("Сейчас погода: 22.0°C, \n/help - команды".to_string())
        );
    }

    #[tokio::test]
    async fn test_hot_and_cold_images() {
        let images = ImagesConfig::default();
        let news = FixedNews(Err(ProviderError::Empty));

        let hot = FixedWeather::new(reading(30.0));
        let replies = run(lookup("dubai"), &hot, &news).await;
        assert_eq!(replies[0], Reply::Photo(images.sunny.clone()));

        let cold = FixedWeather::new(reading(9.999));
        let replies = run(lookup("oslo"), &cold, &news).await;
        assert_eq!(replies[0], Reply::Photo(images.cold.clone()));
    }

    #[tokio::test]
    async fn test_provider_errors_collapse_to_invalid_city() {
        let news = FixedNews(Err(ProviderError::Empty));
        for error in [
            ProviderError::MissingField,
            ProviderError::Status(500),
            ProviderError::Transport("timed out".to_string()),
            ProviderError::Decode("eof".to_string()),
        ] {
            let weather = FixedWeather::new(Err(error));
            let replies = run(lookup("atlantis"), &weather, &news).await;
            assert_eq!(replies, vec![Reply::ReplyTo(INVALID_CITY_TEXT.to_string())]);
        }
    }

    #[tokio::test]
    async fn test_news_success_formats_item() {
        let weather = FixedWeather::new(reading(0.0));
        let news = FixedNews(Ok(NewsItem {
            title: "Title".to_string(),
            description: "Body".to_string(),
            url: "https://example.com/a".to_string(),
        }));
        let replies = run(CommandKind::News, &weather, &news).await;

        assert_eq!(
            replies,
            vec![Reply::Text("Title\n\nBody\n\nhttps://example.com/a".to_string())]
        );
    }

    #[tokio::test]
    async fn test_news_failures_are_unavailable() {
        let weather = FixedWeather::new(reading(0.0));
        for error in [
            ProviderError::Empty,
            ProviderError::Status(429),
            ProviderError::Decode("expected value at line 1".to_string()),
            ProviderError::Transport("operation timed out".to_string()),
            ProviderError::Entropy("unsupported".to_string()),
        ] {
            let news = FixedNews(Err(error));
            let replies = run(CommandKind::News, &weather, &news).await;
            assert_eq!(
                replies,
                vec![Reply::ReplyTo(NEWS_UNAVAILABLE_TEXT.to_string())]
            );
        }
    }

    #[tokio::test]
    async fn test_unrecognized_is_silent() {
        let weather = FixedWeather::new(reading(0.0));
        let news = FixedNews(Err(ProviderError::Empty));
        let replies = run(CommandKind::Unrecognized, &weather, &news).await;
        assert!(replies.is_empty());
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }
}
