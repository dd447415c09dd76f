use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::entry::TIMESTAMP_FORMAT;

/// Action tags counted as lookup attempts contain this marker.
pub const SEARCH_MARKER: &str = "SEARCH";
/// Rows with fewer cells than this are ignored by the aggregation.
const MIN_FIELDS: usize = 5;

const TIMESTAMP_FIELD: usize = 0;
const USER_ID_FIELD: usize = 2;
const ACTION_FIELD: usize = 4;
const CHAT_FIELD: usize = 6;
const OUTCOME_FIELD: usize = 8;

/// Point-in-time aggregate over the whole activity log. Derived on every
/// query; nothing is persisted or carried between snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageStats {
    pub total_entries: usize,
    pub entries_today: usize,
    pub total_searches: usize,
    pub successful_searches: usize,
    pub failed_searches: usize,
    pub unique_users_today: usize,
    pub active_groups_today: usize,
}

impl UsageStats {
    /// Single pass over the raw log read, header row included. Every data
    /// row counts toward the total, but rows shorter than the minimum are
    /// excluded from the per-field analysis. An entry counts as "today"
    /// only if its timestamp parses and its date equals `today`;
    /// unparseable timestamps are never today. Search outcomes are matched
    /// exactly, any other value in the outcome cell counts as neither
    /// success nor failure.
    pub fn from_rows(rows: &[Vec<String>], today: NaiveDate) -> Self {
        if rows.len() <= 1 {
            return Self::default();
        }

        let mut stats = Self::default();
        let mut users_today: HashSet<&str> = HashSet::new();
        let mut groups_today: HashSet<&str> = HashSet::new();

        let data = &rows[1..];
        stats.total_entries = data.len();

        for row in data {
            if row.len() < MIN_FIELDS {
                continue;
            }

            let action = row.get(ACTION_FIELD).map(String::as_str).unwrap_or("");
            if action.contains(SEARCH_MARKER) {
                stats.total_searches += 1;
                match row.get(OUTCOME_FIELD).map(String::as_str) {
                    Some("SUCCESS") => stats.successful_searches += 1,
                    Some("FAILURE") => stats.failed_searches += 1,
                    _ => {}
                }
            }

            if entry_date(row) == Some(today) {
                stats.entries_today += 1;
                if let Some(user_id) = row.get(USER_ID_FIELD) {
                    if !user_id.is_empty() {
                        users_today.insert(user_id);
                    }
                }
                if let Some(chat) = row.get(CHAT_FIELD) {
                    if chat.contains("Group") {
                        groups_today.insert(chat);
                    }
                }
            }
        }

        stats.unique_users_today = users_today.len();
        stats.active_groups_today = groups_today.len();
        stats
    }
}

fn entry_date(row: &[String]) -> Option<NaiveDate> {
    let timestamp = row.get(TIMESTAMP_FIELD)?;
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.date())
}
