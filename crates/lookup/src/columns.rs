/// Header names containing any of these (case-insensitively) are treated as
/// the lookup-key column. First match in header order wins.
pub const KEY_COLUMN_KEYWORDS: &[&str] = &["client", "number", "id", "code"];

/// Pick the key column for a header row.
///
/// Runs once per store session; the result is cached by the caller and never
/// re-derived, even if the backing sheet is restructured later. Headers with
/// no keyword hit fall back to the first column.
pub fn resolve_key_column(headers: &[String]) -> usize {
    for (index, header) in headers.iter().enumerate() {
        let normalized = header.to_lowercase();
        let normalized = normalized.trim();
        if KEY_COLUMN_KEYWORDS
            .iter()
            .any(|keyword| normalized.contains(keyword))
        {
            return index;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_keyword_match_wins() {
        let h = headers(&["Nombre", "Client Phone Number", "Correo", "ID"]);
        assert_eq!(resolve_key_column(&h), 1);
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        assert_eq!(resolve_key_column(&headers(&["Nombre", "CÓDIGO", "code interno"])), 2);
        assert_eq!(resolve_key_column(&headers(&["iD", "x"])), 0);
        assert_eq!(resolve_key_column(&headers(&["x", "NUMBER"])), 1);
    }

    #[test]
    fn no_match_falls_back_to_first_column() {
        assert_eq!(resolve_key_column(&headers(&["Nombre", "Correo", "Ciudad"])), 0);
        assert_eq!(resolve_key_column(&[]), 0);
    }

    #[test]
    fn every_keyword_position_is_found_first() {
        // Property from the contract: for any header row with its first
        // keyword hit at position i, resolve returns exactly i.
        for i in 0..6 {
            let mut h = vec!["aaa".to_string(); 6];
            h[i] = "Client Number".to_string();
            assert_eq!(resolve_key_column(&h), i, "hit planted at {i}");
        }
    }

    #[test]
    fn surrounding_whitespace_in_headers_is_ignored() {
        assert_eq!(resolve_key_column(&headers(&["Nombre", "  id  "])), 1);
    }
}
