use std::sync::Arc;

use desk_sheets::Spreadsheet;

use crate::entry::{civil_today, LogEntry};
use crate::error::{AuditError, Result};
use crate::stats::UsageStats;

/// Nine columns per entry; the first row of the sheet is a header.
pub const LOG_RANGE: &str = "Sheet1!A:I";
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Append-only activity log backed by a spreadsheet tab.
///
/// Every entry is mirrored to the process log before the durable append,
/// and append failures are swallowed: auditing must never delay or fail a
/// user-facing reply. Reads return [`AuditError::Disabled`] when no sheet
/// was configured so callers can distinguish that from an empty log.
pub struct ActivityLog {
    sheet: Option<Arc<dyn Spreadsheet>>,
}

impl ActivityLog {
    pub fn new(sheet: Arc<dyn Spreadsheet>) -> Self {
        Self { sheet: Some(sheet) }
    }

    pub fn disabled() -> Self {
        Self { sheet: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sheet.is_some()
    }

    /// Records one entry. Returns whether the durable append succeeded;
    /// callers treat both outcomes as non-fatal.
    pub async fn record(&self, entry: LogEntry) -> bool {
        log::info!("{}", entry.local_line());

        let Some(sheet) = self.sheet.as_ref() else {
            return false;
        };
        match sheet.append_row(LOG_RANGE, entry.to_row()).await {
            Ok(()) => true,
            Err(err) => {
                log::error!("failed to append audit entry: {err}");
                false
            }
        }
    }

    /// Last `limit` raw entry rows in append order, header excluded. Rows
    /// come back as the sheet stores them, so trailing empty cells may be
    /// missing; renderers must tolerate short rows.
    pub async fn recent_entries(&self, limit: usize) -> Result<Vec<Vec<String>>> {
        let sheet = self.sheet.as_ref().ok_or(AuditError::Disabled)?;
        let rows = sheet.get_range(LOG_RANGE).await?;
        if rows.len() <= 1 {
            return Ok(Vec::new());
        }
        let data = &rows[1..];
        let start = data.len().saturating_sub(limit);
        Ok(data[start..].to_vec())
    }

    /// Rescans the whole log and aggregates it against today's civil date.
    /// Nothing is cached between calls.
    pub async fn snapshot(&self) -> Result<UsageStats> {
        let sheet = self.sheet.as_ref().ok_or(AuditError::Disabled)?;
        let rows = sheet.get_range(LOG_RANGE).await?;
        Ok(UsageStats::from_rows(&rows, civil_today()))
    }
}
