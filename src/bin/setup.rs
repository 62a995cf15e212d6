//! Weatherbot setup wizard.
//!
//! Prompts for the Telegram token, provider API keys and database path in the
//! terminal and writes `config.toml` to the project root (`WEATHERBOT_ROOT`,
//! or the current directory).

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

struct ConfigParams<'a> {
    tg_token: &'a str,
    weather_key: &'a str,
    news_key: &'a str,
    country: &'a str,
    db_path: &'a str,
    max_concurrent: usize,
}

/// Produces a valid config.toml string. Extracted so it can be unit-tested.
fn format_config(p: &ConfigParams<'_>) -> String {
    let tg_token = toml_string(p.tg_token);
    let weather_key = toml_string(p.weather_key);
    let news_key = toml_string(p.news_key);
    let country = toml_string(p.country);
    let db_path = toml_string(p.db_path);
    let max_concurrent = p.max_concurrent;

    format!(
        r#"[telegram]
bot_token = {tg_token}

[weather]
api_key = {weather_key}
base_url = "https://api.openweathermap.org/data/2.5"
units = "metric"
timeout_secs = 10

[news]
api_key = {news_key}
base_url = "https://newsapi.org/v2"
country = {country}
timeout_secs = 10

[storage]
database_path = {db_path}

[dispatch]
max_concurrent = {max_concurrent}
"#
    )
}

/// Quoted, escaped TOML string literal.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_owned()).to_string()
}

fn parse_max_concurrent(input: &str) -> Result<usize> {
    let n = input
        .parse::<usize>()
        .context("Max concurrent handlers must be a positive number")?;
    if n == 0 {
        anyhow::bail!("Max concurrent handlers must be at least 1");
    }
    Ok(n)
}

fn run_cli(project_root: &Path) -> Result<()> {
    println!("=== Weatherbot Setup ===\n");

    let read_line = |prompt: &str| -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        Ok(buf.trim().to_owned())
    };

    let or_default = |s: String, default: &str| {
        if s.is_empty() {
            default.to_owned()
        } else {
            s
        }
    };

    let tg_token = read_line("Telegram bot token: ")?;
    let weather_key = read_line("OpenWeatherMap API key: ")?;
    let news_key = read_line("NewsAPI key: ")?;
    let country = or_default(read_line("News country [us]: ")?, "us");
    let db_path = or_default(read_line("Database path [weatherbot.db]: ")?, "weatherbot.db");
    let max_concurrent =
        parse_max_concurrent(&or_default(read_line("Max concurrent handlers [8]: ")?, "8"))?;

    let config = format_config(&ConfigParams {
        tg_token: &tg_token,
        weather_key: &weather_key,
        news_key: &news_key,
        country: &country,
        db_path: &db_path,
        max_concurrent,
    });

    let config_path = project_root.join("config.toml");
    std::fs::write(&config_path, &config)
        .with_context(|| format!("Could not write {}", config_path.display()))?;

    println!("\n✓  config.toml saved to {}", config_path.display());
    println!("   Run the bot with:  cargo run");
    Ok(())
}

fn main() -> Result<()> {
    let project_root =
        PathBuf::from(std::env::var("WEATHERBOT_ROOT").unwrap_or_else(|_| ".".to_string()));
    run_cli(&project_root)
}
