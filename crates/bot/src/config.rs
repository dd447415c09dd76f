//! Process configuration, pulled from the environment once at startup.

use anyhow::{Context, Result};
use std::env;

/// Secret Manager name of the bot token used outside development.
pub const TELEGRAM_TOKEN_SECRET: &str = "telegram-bot-token";

/// Secret Manager name of the service-account credentials blob.
pub const SHEETS_CREDENTIALS_SECRET: &str = "google-credentials-json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub environment: Environment,
    pub project_id: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub logs_spreadsheet_id: Option<String>,
    /// Actor ids allowed to read stats and the persistent log.
    pub authorized_users: Vec<i64>,
    /// Development-mode token, `DEMO_BOT_TOKEN` winning over
    /// `TELEGRAM_BOT_TOKEN`.
    pub dev_token: Option<String>,
}

impl BotConfig {
    /// `AUTHORIZED_USERS` must parse completely; a bad entry stops startup
    /// rather than shrinking the allow-list.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: parse_environment(env_trimmed("ENVIRONMENT").as_deref()),
            project_id: env_trimmed("GCP_PROJECT_ID"),
            spreadsheet_id: env_trimmed("SPREADSHEET_ID"),
            logs_spreadsheet_id: env_trimmed("LOGS_SPREADSHEET_ID"),
            authorized_users: parse_user_list(
                &env::var("AUTHORIZED_USERS").unwrap_or_default(),
            )?,
            dev_token: env_trimmed("DEMO_BOT_TOKEN")
                .or_else(|| env_trimmed("TELEGRAM_BOT_TOKEN")),
        })
    }
}

/// An empty allow-list authorizes everyone; a non-empty one is exact.
pub fn is_authorized(allow_list: &[i64], user_id: i64) -> bool {
    allow_list.is_empty() || allow_list.contains(&user_id)
}

fn env_trimmed(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_environment(raw: Option<&str>) -> Environment {
    match raw {
        Some(value) if value.eq_ignore_ascii_case("development") => Environment::Development,
        _ => Environment::Production,
    }
}

/// Splits the allow-list. Blank entries are skipped; a non-numeric entry
/// is a configuration error.
fn parse_user_list(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<i64>()
                .with_context(|| format!("AUTHORIZED_USERS entry '{entry}' is not a user id"))
        })
        .collect()
}
