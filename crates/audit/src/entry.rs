use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// All entry timestamps are civil time in this zone, not UTC.
pub const LOG_TIMEZONE: Tz = chrono_tz::America::Mexico_City;
/// Second-precision civil timestamp, e.g. `2024-03-05 14:07:33`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn civil_timestamp() -> String {
    Utc::now()
        .with_timezone(&LOG_TIMEZONE)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

pub(crate) fn civil_today() -> NaiveDate {
    Utc::now().with_timezone(&LOG_TIMEZONE).date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLevel {
    Info,
    System,
}

impl EntryLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryLevel::Info => "INFO",
            EntryLevel::System => "SYSTEM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Success,
    Failure,
}

impl SearchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchOutcome::Success => "SUCCESS",
            SearchOutcome::Failure => "FAILURE",
        }
    }
}

/// One audit record, stamped at construction time and append-only after
/// that. Serialized as a nine-cell row; empty optional fields stay empty
/// strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: EntryLevel,
    pub user_id: String,
    pub username: String,
    pub action: String,
    pub details: String,
    pub chat_label: String,
    pub client_number: String,
    pub outcome: Option<SearchOutcome>,
}

impl LogEntry {
    pub fn user_action(
        user_id: impl Into<String>,
        username: impl Into<String>,
        chat_label: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: civil_timestamp(),
            level: EntryLevel::Info,
            user_id: user_id.into(),
            username: username.into(),
            action: action.into(),
            details: String::new(),
            chat_label: chat_label.into(),
            client_number: String::new(),
            outcome: None,
        }
    }

    /// Process-level event such as startup or shutdown, attributed to the
    /// bot itself rather than a user.
    pub fn system_event(event: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            timestamp: civil_timestamp(),
            level: EntryLevel::System,
            user_id: "SYSTEM".to_string(),
            username: "Bot System".to_string(),
            action: event.into(),
            details: details.into(),
            chat_label: "System".to_string(),
            client_number: String::new(),
            outcome: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn with_client_number(mut self, client_number: impl Into<String>) -> Self {
        self.client_number = client_number.into();
        self
    }

    pub fn with_outcome(mut self, outcome: SearchOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.level.as_str().to_string(),
            self.user_id.clone(),
            self.username.clone(),
            self.action.clone(),
            self.details.clone(),
            self.chat_label.clone(),
            self.client_number.clone(),
            self.outcome.map_or_else(String::new, |o| o.as_str().to_string()),
        ]
    }

    /// Single-line rendering for the process log, mirroring what goes to
    /// the durable sheet.
    pub fn local_line(&self) -> String {
        if self.level == EntryLevel::System {
            return format!("SYSTEM EVENT: {} | {}", self.action, self.details);
        }
        let mut line = format!(
            "USER: {} | ID: {} | CHAT: {} | ACTION: {}",
            self.username, self.user_id, self.chat_label, self.action
        );
        if !self.details.is_empty() {
            line.push_str(&format!(" | DETAILS: {}", self.details));
        }
        if !self.client_number.is_empty() {
            line.push_str(&format!(" | CLIENT: {}", self.client_number));
        }
        if let Some(outcome) = self.outcome {
            line.push_str(&format!(" | RESULT: {}", outcome.as_str()));
        }
        line
    }
}
