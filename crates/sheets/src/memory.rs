use crate::{Result, SheetsError, Spreadsheet};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory [`Spreadsheet`] for tests and offline development.
///
/// Mirrors the wire behavior that matters to callers: rows come back ragged
/// (trailing empty cells omitted), reads of an empty table are an empty Vec,
/// and a store flagged unavailable fails every operation the way a dead
/// connection would.
pub struct MemorySheet {
    rows: Mutex<Vec<Vec<String>>>,
    unavailable: AtomicBool,
}

impl MemorySheet {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }

    pub fn rows_snapshot(&self) -> Vec<Vec<String>> {
        self.rows.lock().expect("rows lock").clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SheetsError::Unavailable(
                "memory sheet flagged unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Spreadsheet for MemorySheet {
    async fn get_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        self.check_available()?;
        let span = RangeSpan::parse(range)?;
        let rows = self.rows.lock().expect("rows lock");

        let mut out: Vec<Vec<String>> = match span {
            RangeSpan::Rows(start, end) => rows
                .iter()
                .skip(start)
                .take(end.saturating_sub(start) + 1)
                .map(|row| trim_trailing_empty(row.clone()))
                .collect(),
            RangeSpan::Columns(start, end) => rows
                .iter()
                .map(|row| {
                    let slice: Vec<String> = row
                        .iter()
                        .skip(start)
                        .take(end.saturating_sub(start) + 1)
                        .cloned()
                        .collect();
                    trim_trailing_empty(slice)
                })
                .collect(),
        };

        while out.last().is_some_and(|row| row.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    async fn append_row(&self, _range: &str, row: Vec<String>) -> Result<()> {
        self.check_available()?;
        self.rows.lock().expect("rows lock").push(row);
        Ok(())
    }
}

enum RangeSpan {
    /// Inclusive zero-based row window, e.g. `1:1` -> (0, 0).
    Rows(usize, usize),
    /// Inclusive zero-based column window, e.g. `A:C` -> (0, 2).
    Columns(usize, usize),
}

impl RangeSpan {
    fn parse(range: &str) -> Result<Self> {
        // Strip the sheet qualifier: "Sheet1!A:Z" -> "A:Z".
        let cells = range.rsplit('!').next().unwrap_or(range);
        let (lo, hi) = cells
            .split_once(':')
            .ok_or_else(|| SheetsError::InvalidRange(range.to_string()))?;

        if lo.chars().all(|c| c.is_ascii_digit()) && hi.chars().all(|c| c.is_ascii_digit()) {
            let lo: usize = lo
                .parse()
                .map_err(|_| SheetsError::InvalidRange(range.to_string()))?;
            let hi: usize = hi
                .parse()
                .map_err(|_| SheetsError::InvalidRange(range.to_string()))?;
            if lo == 0 || hi < lo {
                return Err(SheetsError::InvalidRange(range.to_string()));
            }
            return Ok(RangeSpan::Rows(lo - 1, hi - 1));
        }

        if lo.chars().all(|c| c.is_ascii_alphabetic())
            && hi.chars().all(|c| c.is_ascii_alphabetic())
        {
            let lo = column_index(lo).ok_or_else(|| SheetsError::InvalidRange(range.to_string()))?;
            let hi = column_index(hi).ok_or_else(|| SheetsError::InvalidRange(range.to_string()))?;
            if hi < lo {
                return Err(SheetsError::InvalidRange(range.to_string()));
            }
            return Ok(RangeSpan::Columns(lo, hi));
        }

        Err(SheetsError::InvalidRange(range.to_string()))
    }
}

/// A1-notation column letters to a zero-based index: A -> 0, Z -> 25, AA -> 26.
fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut value = 0usize;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as u8).checked_sub(b'A')? as usize;
        if digit > 25 {
            return None;
        }
        value = value * 26 + digit + 1;
    }
    Some(value - 1)
}

fn trim_trailing_empty(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|cell| cell.trim().is_empty()) {
        row.pop();
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> Vec<Vec<String>> {
        vec![
            vec!["ID".into(), "Nombre".into(), "Correo".into()],
            vec!["123".into(), "Ana".into(), "a@x.com".into()],
            vec!["456".into(), "Bea".into(), "".into()],
        ]
    }

    #[tokio::test]
    async fn header_row_read_via_row_range() {
        let sheet = MemorySheet::new(table());
        let rows = sheet.get_range("Sheet1!1:1").await.expect("read");
        assert_eq!(rows, vec![vec!["ID", "Nombre", "Correo"]]);
    }

    #[tokio::test]
    async fn full_table_read_trims_trailing_empty_cells() {
        let sheet = MemorySheet::new(table());
        let rows = sheet.get_range("Sheet1!A:Z").await.expect("read");
        assert_eq!(rows.len(), 3);
        // Bea's empty email cell is omitted on the wire.
        assert_eq!(rows[2], vec!["456", "Bea"]);
    }

    #[tokio::test]
    async fn single_column_read_projects_first_cells() {
        let sheet = MemorySheet::new(table());
        let rows = sheet.get_range("Sheet1!A:A").await.expect("read");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["123"]);
    }

    #[tokio::test]
    async fn append_then_read_round_trips() {
        let sheet = MemorySheet::empty();
        sheet
            .append_row("Sheet1!A:I", vec!["a".into(), "b".into()])
            .await
            .expect("append");
        let rows = sheet.get_range("Sheet1!A:I").await.expect("read");
        assert_eq!(rows, vec![vec!["a", "b"]]);
    }

    #[tokio::test]
    async fn unavailable_sheet_fails_both_operations() {
        let sheet = MemorySheet::new(table());
        sheet.set_unavailable(true);
        assert!(matches!(
            sheet.get_range("Sheet1!A:Z").await,
            Err(SheetsError::Unavailable(_))
        ));
        assert!(matches!(
            sheet.append_row("Sheet1!A:I", vec![]).await,
            Err(SheetsError::Unavailable(_))
        ));
    }

    #[test]
    fn column_letters_cover_multi_letter_ranges() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("I"), Some(8));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index(""), None);
    }
}
