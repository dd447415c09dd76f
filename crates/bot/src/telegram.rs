//! Minimal Telegram Bot API client: long polling plus the handful of
//! methods this service answers with.
//!
//! Every call goes through the JSON envelope (`ok`/`result`/`description`).
//! An `ok: false` answer surfaces as [`TelegramError::Api`] so the poll
//! loop can tell a dead token apart from a network blip.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://api.telegram.org";

/// Long-poll window for `getUpdates`, in seconds. The HTTP client timeout
/// must sit above this or every idle poll turns into a timeout error.
pub const POLL_TIMEOUT_SECS: u64 = 30;

const PARSE_MODE: &str = "Markdown";

pub type Result<T> = std::result::Result<T, TelegramError>;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },
}

impl TelegramError {
    /// Bad or revoked token. Retrying the poll cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Api { code: 401 | 404, .. })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    /// Kinds added after this client was written parse instead of failing
    /// the whole `getUpdates` batch.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(default)]
    pub title: Option<String>,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ChatKind::Group | ChatKind::Supergroup)
    }
}

// `result` and `description` must not carry `#[serde(default)]`: on a
// generic field the derive would demand `T: Default`, and a missing key
// already reads as `None`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    #[serde(default)]
    error_code: i64,
}

#[derive(Debug, Serialize)]
struct GetUpdatesBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
}

/// Bot API client bound to one token.
pub struct TelegramApi {
    http: reqwest::Client,
    base: String,
}

impl TelegramApi {
    pub fn new(http: reqwest::Client, token: &str) -> Self {
        Self {
            http,
            base: format!("{API_BASE}/bot{token}"),
        }
    }

    /// Client aimed at an arbitrary base instead of the real API.
    #[cfg(test)]
    pub(crate) fn with_base(http: reqwest::Client, base: &str) -> Self {
        Self {
            http,
            base: base.to_string(),
        }
    }

    pub async fn get_me(&self) -> Result<User> {
        let url = format!("{}/getMe", self.base);
        let response = self.http.get(&url).send().await?;
        unwrap_envelope("getMe", response.json().await?)
    }

    pub async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>> {
        let body = GetUpdatesBody {
            offset,
            timeout,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &body).await
    }

    /// Send Markdown text to a chat, optionally as a reply to one message.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<Message> {
        let body = SendMessageBody {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
            reply_to_message_id: reply_to,
        };
        self.call("sendMessage", &body).await
    }

    /// Discard every update queued while the bot was down and return the
    /// offset to poll from. `offset: -1` asks for the newest update only,
    /// so acknowledging past it drops the whole backlog.
    pub async fn drop_pending_updates(&self) -> Result<Option<i64>> {
        let body = GetUpdatesBody {
            offset: Some(-1),
            timeout: 0,
            allowed_updates: &["message"],
        };
        let newest: Vec<Update> = self.call("getUpdates", &body).await?;
        Ok(newest.last().map(|update| update.update_id + 1))
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &impl Serialize) -> Result<T> {
        let url = format!("{}/{}", self.base, method);
        let response = self.http.post(&url).json(body).send().await?;
        unwrap_envelope(method, response.json().await?)
    }
}

fn unwrap_envelope<T>(method: &str, envelope: ApiEnvelope<T>) -> Result<T> {
    if !envelope.ok {
        return Err(TelegramError::Api {
            code: envelope.error_code,
            description: envelope.description.unwrap_or_default(),
        });
    }
    envelope.result.ok_or_else(|| TelegramError::Api {
        code: 0,
        description: format!("{method} answered ok without a result"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn private_text_update_parses() {
        let raw = r#"{
            "update_id": 900100,
            "message": {
                "message_id": 42,
                "from": {"id": 777, "is_bot": false, "first_name": "Ana", "username": "ana_v"},
                "chat": {"id": 777, "first_name": "Ana", "type": "private"},
                "date": 1714000000,
                "text": "10234"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).expect("valid update");
        assert_eq!(update.update_id, 900100);
        let message = update.message.expect("message present");
        assert!(message.chat.is_private());
        assert_eq!(message.text.as_deref(), Some("10234"));
        assert_eq!(message.from.expect("sender").username.as_deref(), Some("ana_v"));
    }

    #[test]
    fn group_reply_carries_the_quoted_message() {
        let raw = r#"{
            "update_id": 900101,
            "message": {
                "message_id": 43,
                "from": {"id": 777, "is_bot": false, "first_name": "Ana"},
                "chat": {"id": -100200, "type": "supergroup", "title": "Soporte"},
                "date": 1714000001,
                "text": "10234",
                "reply_to_message": {
                    "message_id": 40,
                    "from": {"id": 555, "is_bot": true, "first_name": "Desk"},
                    "chat": {"id": -100200, "type": "supergroup", "title": "Soporte"},
                    "date": 1713999990,
                    "text": "listo"
                }
            }
        }"#;
        let update: Update = serde_json::from_str(raw).expect("valid update");
        let message = update.message.expect("message present");
        assert!(message.chat.is_group());
        assert_eq!(message.chat.title.as_deref(), Some("Soporte"));
        let quoted = message.reply_to_message.expect("quoted message");
        assert_eq!(quoted.from.expect("bot sender").id, 555);
    }

    #[test]
    fn unexpected_chat_kinds_still_parse() {
        let chat: Chat =
            serde_json::from_str(r#"{"id": 1, "type": "business_topic"}"#).expect("parses");
        assert_eq!(chat.kind, ChatKind::Unknown);
        assert!(!chat.is_private());
        assert!(!chat.is_group());
    }

    #[test]
    fn error_envelope_surfaces_code_and_description() {
        let raw = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let envelope: ApiEnvelope<Vec<Update>> = serde_json::from_str(raw).expect("parses");
        let err = unwrap_envelope("getUpdates", envelope).expect_err("must fail");
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Telegram API error 401: Unauthorized"
        );
    }

    #[test]
    fn ok_envelope_without_result_is_an_error() {
        let envelope: ApiEnvelope<User> = serde_json::from_str(r#"{"ok": true}"#).expect("parses");
        let err = unwrap_envelope("getMe", envelope).expect_err("must fail");
        assert!(!err.is_fatal());
    }

    #[test]
    fn me_envelope_unwraps_the_account() {
        let raw = r#"{
            "ok": true,
            "result": {"id": 555, "is_bot": true, "first_name": "Desk", "username": "desk_bot"}
        }"#;
        let envelope: ApiEnvelope<User> = serde_json::from_str(raw).expect("parses");
        let me = unwrap_envelope("getMe", envelope).expect("result present");
        assert_eq!(me.id, 555);
        assert_eq!(me.username.as_deref(), Some("desk_bot"));
    }

    #[test]
    fn error_envelope_without_description_keeps_the_code() {
        // The description key is optional on error envelopes.
        let envelope: ApiEnvelope<Vec<Message>> =
            serde_json::from_str(r#"{"ok": false, "error_code": 409}"#).expect("parses");
        let err = unwrap_envelope("getUpdates", envelope).expect_err("must fail");
        assert!(!err.is_fatal());
        assert!(
            matches!(err, TelegramError::Api { code: 409, ref description } if description.is_empty())
        );
    }

    #[test]
    fn send_body_omits_the_reply_target_when_absent() {
        let body = SendMessageBody {
            chat_id: 777,
            text: "hola",
            parse_mode: PARSE_MODE,
            reply_to_message_id: None,
        };
        let value = serde_json::to_value(&body).expect("serializes");
        assert_eq!(value["chat_id"], 777);
        assert_eq!(value["parse_mode"], "Markdown");
        assert!(value.get("reply_to_message_id").is_none());
    }
}
