//! Update dispatch: one incoming message in, at most one reply out.
//!
//! Command handlers and the number search convert every domain error into
//! reply text themselves; the only errors that leave this module are
//! Telegram transport failures.

use crate::addressing::{self, Addressed};
use crate::commands::{self, Command};
use crate::config;
use crate::replies;
use crate::telegram::{Chat, Message, Result, TelegramApi, Update, User};
use desk_audit::{ActivityLog, LogEntry, SearchOutcome, DEFAULT_RECENT_LIMIT, SEARCH_MARKER};
use desk_lookup::ClientDirectory;
use tokio::sync::OnceCell;

pub struct App {
    api: TelegramApi,
    directory: ClientDirectory,
    audit: ActivityLog,
    allowed_users: Vec<i64>,
    /// Own Telegram account, fetched once on first use. Group messages
    /// need it to recognize mentions and replies; private traffic never
    /// pays for the call.
    identity: OnceCell<User>,
}

impl App {
    pub fn new(
        api: TelegramApi,
        directory: ClientDirectory,
        audit: ActivityLog,
        allowed_users: Vec<i64>,
    ) -> Self {
        Self {
            api,
            directory,
            audit,
            allowed_users,
            identity: OnceCell::new(),
        }
    }

    pub fn api(&self) -> &TelegramApi {
        &self.api
    }

    pub fn audit(&self) -> &ActivityLog {
        &self.audit
    }

    pub async fn handle_update(&self, update: Update) -> Result<()> {
        let Some(message) = update.message else {
            return Ok(());
        };
        let (Some(user), Some(text)) = (message.from.clone(), message.text.clone()) else {
            return Ok(());
        };
        let text = text.trim().to_string();

        if text.starts_with('/') {
            if let Some(parsed) = commands::parse(&text) {
                if self.command_is_for_us(parsed.target.as_deref()).await? {
                    self.run_command(parsed.command, &message, &user).await?;
                }
            }
            // Unknown or foreign commands are nobody's client number.
            return Ok(());
        }

        self.handle_search(&message, &user, &text).await
    }

    async fn identity(&self) -> Result<&User> {
        self.identity
            .get_or_try_init(|| async {
                let me = self.api.get_me().await?;
                log::info!(
                    "acting as @{} (id {})",
                    me.username.as_deref().unwrap_or("unknown"),
                    me.id
                );
                Ok(me)
            })
            .await
    }

    async fn command_is_for_us(&self, target: Option<&str>) -> Result<bool> {
        let Some(target) = target else {
            return Ok(true);
        };
        let me = self.identity().await?;
        Ok(me
            .username
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(target)))
    }

    async fn run_command(&self, command: Command, message: &Message, user: &User) -> Result<()> {
        self.audit
            .record(LogEntry::user_action(
                user.id.to_string(),
                actor_handle(user),
                chat_label(&message.chat),
                command.action(),
            ))
            .await;

        let reply = match command {
            Command::Start => {
                if message.chat.is_private() {
                    replies::welcome_private(&user.first_name)
                } else {
                    replies::WELCOME_GROUP.to_string()
                }
            }
            Command::Help => replies::HELP.to_string(),
            Command::Info => replies::sheet_summary(&self.directory.info().await),
            Command::Status => {
                let info = self.directory.info().await;
                let logs_working = self.audit.recent_entries(1).await.is_ok();
                replies::status_report(
                    self.directory.is_connected(),
                    logs_working,
                    info.total_records,
                )
            }
            Command::Whoami => replies::user_card(
                user,
                config::is_authorized(&self.allowed_users, user.id),
            ),
            Command::Stats => {
                if !config::is_authorized(&self.allowed_users, user.id) {
                    replies::STATS_FORBIDDEN.to_string()
                } else {
                    match self.audit.snapshot().await {
                        Ok(stats) => replies::usage_report(&stats),
                        Err(err) => {
                            log::error!("usage snapshot failed: {err}");
                            replies::STATS_UNAVAILABLE.to_string()
                        }
                    }
                }
            }
            Command::Plogs => {
                if !config::is_authorized(&self.allowed_users, user.id) {
                    replies::LOGS_FORBIDDEN.to_string()
                } else {
                    let entries = self
                        .audit
                        .recent_entries(DEFAULT_RECENT_LIMIT)
                        .await
                        .unwrap_or_default();
                    if entries.is_empty() {
                        replies::LOGS_EMPTY.to_string()
                    } else {
                        replies::recent_log_lines(&entries)
                    }
                }
            }
        };

        self.api.send_message(message.chat.id, &reply, None).await?;
        Ok(())
    }

    async fn handle_search(&self, message: &Message, user: &User, text: &str) -> Result<()> {
        log::info!(
            "processing message from {} in {:?}: '{}'",
            user.first_name,
            message.chat.kind,
            text
        );

        let addressed = if message.chat.is_private() {
            Some(Addressed::direct(text))
        } else if message.chat.is_group() {
            let me = self.identity().await?;
            addressing::group_addressed(message, me)
        } else {
            None
        };
        let Some(addressed) = addressed else {
            return Ok(());
        };

        let Some(client_number) = addressing::extract_digits(&addressed.text) else {
            if addressed.direct {
                self.api
                    .send_message(
                        message.chat.id,
                        replies::INVALID_NUMBER,
                        Some(message.message_id),
                    )
                    .await?;
            }
            return Ok(());
        };

        match self.directory.find(&client_number).await {
            Ok(Some(record)) => {
                self.audit
                    .record(search_entry(
                        user,
                        &message.chat,
                        &client_number,
                        Some(record.len()),
                    ))
                    .await;
                let reply = replies::record_found(&client_number, &record, user);
                self.api
                    .send_message(message.chat.id, &reply, Some(message.message_id))
                    .await?;
            }
            other => {
                if let Err(err) = other {
                    log::error!("lookup for client {client_number} failed: {err}");
                }
                self.audit
                    .record(search_entry(user, &message.chat, &client_number, None))
                    .await;
                self.api
                    .send_message(
                        message.chat.id,
                        &replies::record_missing(&client_number),
                        Some(message.message_id),
                    )
                    .await?;
            }
        }
        Ok(())
    }
}

/// Audit entry for one lookup attempt. A hit carries the record's field
/// count; a miss is marked `FAILURE`.
fn search_entry(user: &User, chat: &Chat, client_number: &str, fields: Option<usize>) -> LogEntry {
    let entry = LogEntry::user_action(
        user.id.to_string(),
        actor_handle(user),
        chat_label(chat),
        SEARCH_MARKER,
    )
    .with_client_number(client_number);
    match fields {
        Some(count) => entry
            .with_details(format!("Client: {client_number}, Fields: {count}"))
            .with_outcome(SearchOutcome::Success),
        None => entry
            .with_details(format!("Client: {client_number}, Not found"))
            .with_outcome(SearchOutcome::Failure),
    }
}

/// `@username (FirstName)` attribution for audit rows, with a stand-in
/// when the account has no username.
fn actor_handle(user: &User) -> String {
    format!(
        "@{} ({})",
        user.username.as_deref().unwrap_or("NoUsername"),
        user.first_name
    )
}

fn chat_label(chat: &Chat) -> String {
    if chat.is_private() {
        "Private".to_string()
    } else {
        format!("Group ({})", chat.title.as_deref().unwrap_or(""))
    }
}
