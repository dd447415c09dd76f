use std::sync::Arc;

use desk_sheets::Spreadsheet;

use crate::columns::resolve_key_column;
use crate::error::{LookupError, Result};
use crate::matcher::find_record;
use crate::record::Record;

/// Header row, read once when the directory connects.
pub const HEADER_RANGE: &str = "Sheet1!1:1";
/// Full table scan used by every lookup.
pub const TABLE_RANGE: &str = "Sheet1!A:Z";
/// First column only, used to count data rows.
pub const COUNT_RANGE: &str = "Sheet1!A:A";

/// Point-in-time description of the backing table for `/info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub total_records: usize,
    pub headers: Vec<String>,
    pub key_column: String,
}

impl SheetInfo {
    fn unavailable() -> Self {
        Self {
            total_records: 0,
            headers: Vec::new(),
            key_column: "Unknown".to_string(),
        }
    }
}

/// Read-only view over the client table.
///
/// The header row and key column index are resolved once at connect time
/// and reused for the directory's lifetime. If the sheet's header is
/// restructured afterwards the cached index goes stale until the process
/// restarts; lookups keep scanning the old position.
pub struct ClientDirectory {
    sheet: Option<Arc<dyn Spreadsheet>>,
    headers: Vec<String>,
    key_index: usize,
}

impl ClientDirectory {
    /// Reads the header row and resolves the key column. A failed read
    /// yields a disconnected directory rather than an error: the service
    /// stays up and answers lookups with "not found".
    pub async fn connect(sheet: Arc<dyn Spreadsheet>) -> Self {
        match sheet.get_range(HEADER_RANGE).await {
            Ok(rows) => {
                let headers = rows.into_iter().next().unwrap_or_default();
                let key_index = resolve_key_column(&headers);
                log::info!(
                    "client directory connected, key column {key_index} of {} headers",
                    headers.len()
                );
                Self {
                    sheet: Some(sheet),
                    headers,
                    key_index,
                }
            }
            Err(err) => {
                log::error!("client directory unavailable: {err}");
                Self::disconnected()
            }
        }
    }

    pub fn disconnected() -> Self {
        Self {
            sheet: None,
            headers: Vec::new(),
            key_index: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.sheet.is_some()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Scans the full table for `key`. Every call re-reads the sheet;
    /// nothing is cached between lookups.
    pub async fn find(&self, key: &str) -> Result<Option<Record>> {
        let sheet = self.sheet.as_ref().ok_or(LookupError::NotConnected)?;
        let rows = sheet.get_range(TABLE_RANGE).await?;
        if rows.len() < 2 {
            return Ok(None);
        }
        Ok(find_record(key, &self.headers, &rows[1..], self.key_index))
    }

    /// Describes the table. Degrades to zeroed counters when the sheet
    /// cannot be read instead of failing the command.
    pub async fn info(&self) -> SheetInfo {
        let Some(sheet) = self.sheet.as_ref() else {
            return SheetInfo::unavailable();
        };
        match sheet.get_range(COUNT_RANGE).await {
            Ok(rows) => SheetInfo {
                total_records: rows.len().saturating_sub(1),
                headers: self.headers.clone(),
                key_column: self
                    .headers
                    .get(self.key_index)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
            },
            Err(err) => {
                log::error!("failed to read sheet info: {err}");
                SheetInfo::unavailable()
            }
        }
    }
}
