//! Clientdesk Telegram bot.
//!
//! Chat front end for a client directory kept in Google Sheets: send the
//! bot a client number and it answers with that client's row, while every
//! interaction lands in an append-only activity sheet.
//!
//! ## Configuration
//!
//! - `ENVIRONMENT` - `development` reads the bot token from the
//!   environment; anything else (the default) reads Secret Manager.
//! - `DEMO_BOT_TOKEN` / `TELEGRAM_BOT_TOKEN` - development-mode token.
//! - `GCP_PROJECT_ID` - project holding the `telegram-bot-token` and
//!   `google-credentials-json` secrets.
//! - `SPREADSHEET_ID` - spreadsheet with the client table.
//! - `LOGS_SPREADSHEET_ID` - spreadsheet receiving the activity log.
//! - `AUTHORIZED_USERS` - comma-separated user ids allowed to read stats
//!   and the persistent log; empty authorizes everyone, a malformed entry
//!   stops startup.
//!
//! The bot token and the allow-list are the only settings that can stop
//! startup. Everything else degrades: without sheets credentials the bot
//! still answers, with lookups reporting not-found and the activity log
//! kept on stderr only.

use anyhow::{Context, Result};
use desk_audit::{ActivityLog, LogEntry};
use desk_lookup::ClientDirectory;
use desk_secrets::{GcpSecretStore, SecretStore, ServiceCredentials, TokenProvider};
use desk_sheets::{SheetTab, SheetsClient, Spreadsheet};
use std::sync::Arc;
use std::time::Duration;

mod addressing;
mod app;
mod commands;
mod config;
mod replies;
mod telegram;

use app::App;
use config::{BotConfig, Environment};
use telegram::{TelegramApi, Update, POLL_TIMEOUT_SECS};

const HTTP_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = BotConfig::from_env()?;

    let google_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;
    // Long polls hold the connection open for POLL_TIMEOUT_SECS, so this
    // client's timeout must sit above it.
    let telegram_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
        .build()
        .context("Failed to build HTTP client")?;

    let token_provider = Arc::new(TokenProvider::new(google_http.clone()));
    let secrets = config.project_id.clone().map(|project_id| {
        GcpSecretStore::new(google_http.clone(), token_provider.clone(), project_id)
    });

    let bot_token = resolve_bot_token(&config, secrets.as_ref()).await?;
    let api = TelegramApi::new(telegram_http, &bot_token);

    let (directory, audit) =
        connect_stores(&config, secrets.as_ref(), &google_http, &token_provider).await;

    audit
        .record(LogEntry::system_event(
            "BOT_STARTUP",
            "Bot starting in polling mode",
        ))
        .await;
    log::info!(
        "sheets connected: {}",
        if directory.is_connected() { "yes" } else { "no" }
    );
    log::info!("total clients: {}", directory.info().await.total_records);
    log::info!(
        "persistent logging: {}",
        if audit.is_enabled() { "yes" } else { "no" }
    );

    let app = Arc::new(App::new(
        api,
        directory,
        audit,
        config.authorized_users.clone(),
    ));

    match poll_loop(&app).await {
        Ok(()) => {
            log::info!("bot stopped by user");
            app.audit()
                .record(LogEntry::system_event(
                    "BOT_SHUTDOWN",
                    "Bot stopped by user (Ctrl+C)",
                ))
                .await;
            Ok(())
        }
        Err(err) => {
            log::error!("critical error running bot: {err:#}");
            app.audit()
                .record(LogEntry::system_event(
                    "BOT_ERROR",
                    format!("Critical error: {err:#}"),
                ))
                .await;
            Err(err)
        }
    }
}

/// The bot token is the only secret allowed to stop startup: without it
/// there is no bot to degrade.
async fn resolve_bot_token(
    config: &BotConfig,
    secrets: Option<&GcpSecretStore>,
) -> Result<String> {
    match config.environment {
        Environment::Development => config.dev_token.clone().context(
            "development mode needs DEMO_BOT_TOKEN or TELEGRAM_BOT_TOKEN in the environment",
        ),
        Environment::Production => {
            let store = secrets.context("GCP_PROJECT_ID must be set outside development")?;
            store
                .get_secret(config::TELEGRAM_TOKEN_SECRET)
                .await
                .context("could not reach Secret Manager for the bot token")?
                .with_context(|| {
                    format!(
                        "secret '{}' is missing or unreadable",
                        config::TELEGRAM_TOKEN_SECRET
                    )
                })
        }
    }
}

/// A missing or malformed credentials secret disables spreadsheet access
/// instead of stopping the bot.
async fn sheets_credentials(secrets: Option<&GcpSecretStore>) -> Option<ServiceCredentials> {
    let Some(store) = secrets else {
        log::warn!("GCP_PROJECT_ID not set; spreadsheet access disabled");
        return None;
    };
    let payload = match store.get_secret(config::SHEETS_CREDENTIALS_SECRET).await {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            log::warn!(
                "secret '{}' not found; spreadsheet access disabled",
                config::SHEETS_CREDENTIALS_SECRET
            );
            return None;
        }
        Err(err) => {
            log::warn!(
                "could not fetch '{}': {err}; spreadsheet access disabled",
                config::SHEETS_CREDENTIALS_SECRET
            );
            return None;
        }
    };
    match ServiceCredentials::from_json(&payload) {
        Ok(credentials) => {
            log::info!("using service account {}", credentials.client_email);
            Some(credentials)
        }
        Err(err) => {
            log::warn!("credentials secret is not usable: {err}; spreadsheet access disabled");
            None
        }
    }
}

/// Build the spreadsheet-backed collaborators. Any gap in configuration
/// or credentials downgrades them instead of stopping the bot.
async fn connect_stores(
    config: &BotConfig,
    secrets: Option<&GcpSecretStore>,
    http: &reqwest::Client,
    token_provider: &Arc<TokenProvider>,
) -> (ClientDirectory, ActivityLog) {
    if sheets_credentials(secrets).await.is_none() {
        return (ClientDirectory::disconnected(), ActivityLog::disabled());
    }
    let client = Arc::new(SheetsClient::new(http.clone(), token_provider.clone()));

    let directory = match &config.spreadsheet_id {
        Some(spreadsheet_id) => {
            let tab: Arc<dyn Spreadsheet> =
                Arc::new(SheetTab::new(client.clone(), spreadsheet_id.clone()));
            ClientDirectory::connect(tab).await
        }
        None => {
            log::warn!("SPREADSHEET_ID not set; lookups will answer not-found");
            ClientDirectory::disconnected()
        }
    };

    let audit = match &config.logs_spreadsheet_id {
        Some(spreadsheet_id) => {
            let tab: Arc<dyn Spreadsheet> = Arc::new(SheetTab::new(client, spreadsheet_id.clone()));
            ActivityLog::new(tab)
        }
        None => {
            log::warn!("LOGS_SPREADSHEET_ID not set; entries go to the process log only");
            ActivityLog::disabled()
        }
    };

    (directory, audit)
}

async fn poll_loop(app: &Arc<App>) -> Result<()> {
    let mut offset = app
        .api()
        .drop_pending_updates()
        .await
        .context("could not flush the pending update backlog")?;
    log::info!("polling for updates");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => return Ok(()),
            batch = app.api().get_updates(offset, POLL_TIMEOUT_SECS) => match batch {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        dispatch(app.clone(), update);
                    }
                }
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => {
                    log::warn!("getUpdates failed: {err}; retrying in {RETRY_DELAY_SECS}s");
                    tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
                }
            },
        }
    }
}

/// Handle one update off the poll loop. A failed handler answers with a
/// generic error, best effort.
fn dispatch(app: Arc<App>, update: Update) {
    let update_id = update.update_id;
    let chat_id = update.message.as_ref().map(|message| message.chat.id);
    tokio::spawn(async move {
        if let Err(err) = app.handle_update(update).await {
            log::warn!("handling update {update_id} failed: {err}");
            if let Some(chat_id) = chat_id {
                let _ = app
                    .api()
                    .send_message(chat_id, replies::INTERNAL_ERROR, None)
                    .await;
            }
        }
    });
}
