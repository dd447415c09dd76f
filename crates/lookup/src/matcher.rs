use crate::record::Record;

/// Scans data rows for the first one whose key cell equals `key` after
/// trimming and lowercasing both sides. Comparison is exact string
/// equality, so `"00123"` never matches `"123"`. Rows too short to carry
/// the key column are skipped.
pub fn find_record(
    key: &str,
    headers: &[String],
    rows: &[Vec<String>],
    key_index: usize,
) -> Option<Record> {
    let needle = key.trim().to_lowercase();
    for row in rows {
        let Some(cell) = row.get(key_index) else {
            continue;
        };
        if cell.trim().to_lowercase() == needle {
            return Some(Record::from_row(headers, row));
        }
    }
    None
}
