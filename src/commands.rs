/// Keyword that starts a weather lookup, followed by the city name.
pub const WEATHER_KEYWORD: &str = "погода";

/// What an inbound message asks the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Help,
    WeatherPrompt,
    WeatherLookup { city: String },
    News,
    Unrecognized,
}

impl CommandKind {
    /// Label recorded next to the stored message; `None` for unrecognized text.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            CommandKind::Start => Some("start"),
            CommandKind::Help => Some("help"),
            CommandKind::WeatherPrompt => Some("weather"),
            CommandKind::WeatherLookup { .. } => Some("weather_lookup"),
            CommandKind::News => Some("news"),
            CommandKind::Unrecognized => None,
        }
    }
}

/// Classify raw message text. Matching is done on the trimmed,
/// lower-cased text; commands must match exactly.
pub fn classify(text: &str) -> CommandKind {
    let normalized = text.trim().to_lowercase();

    match strip_bot_mention(&normalized) {
        "/start" => CommandKind::Start,
        "/help" => CommandKind::Help,
        "/weather" => CommandKind::WeatherPrompt,
        "/news" => CommandKind::News,
        other => match other.strip_prefix(WEATHER_KEYWORD) {
            Some(rest) => CommandKind::WeatherLookup {
                city: rest.trim().to_string(),
            },
            None => CommandKind::Unrecognized,
        },
    }
}

/// In group chats Telegram clients send `/help@SomeBot`. The mention is dropped
/// only from a bare command token; anything with arguments is left alone.
fn strip_bot_mention(text: &str) -> &str {
    if !text.starts_with('/') || text.contains(char::is_whitespace) {
        return text;
    }
    match text.split_once('@') {
        Some((command, bot)) if !bot.is_empty() => command,
        _ => text,
    }
}
