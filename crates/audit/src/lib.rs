mod activity;
mod entry;
mod error;
mod stats;

pub use activity::{ActivityLog, DEFAULT_RECENT_LIMIT, LOG_RANGE};
pub use entry::{EntryLevel, LogEntry, SearchOutcome, LOG_TIMEZONE, TIMESTAMP_FORMAT};
pub use error::{AuditError, Result};
pub use stats::{UsageStats, SEARCH_MARKER};
