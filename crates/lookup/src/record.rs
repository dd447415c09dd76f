/// One matched row projected into `(header, value)` pairs in header order.
///
/// Ephemeral: built per lookup, owned by the request, never cached. Cells
/// that are empty after trimming are omitted rather than carried as empty
/// strings; cells beyond the header width are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Project one raw row against the header row.
    pub fn from_row(headers: &[String], row: &[String]) -> Self {
        let mut fields = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(cell) = row.get(index) {
                let value = cell.trim();
                if !value.is_empty() {
                    fields.push((header.clone(), value.to_string()));
                }
            }
        }
        Self { fields }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn headers() -> Vec<String> {
        vec!["ID".to_string(), "Nombre".to_string(), "Correo".to_string()]
    }

    #[test]
    fn projects_cells_in_header_order() {
        let row = vec![
            "123".to_string(),
            "Ana".to_string(),
            "ana@example.com".to_string(),
        ];
        let record = Record::from_row(&headers(), &row);
        assert_eq!(
            record.fields(),
            &[
                ("ID".to_string(), "123".to_string()),
                ("Nombre".to_string(), "Ana".to_string()),
                ("Correo".to_string(), "ana@example.com".to_string()),
            ]
        );
    }

    #[test]
    fn skips_blank_cells_and_trims_values() {
        let row = vec!["123".to_string(), "   ".to_string(), "  ana@example.com ".to_string()];
        let record = Record::from_row(&headers(), &row);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Nombre"), None);
        assert_eq!(record.get("Correo"), Some("ana@example.com"));
    }

    #[test]
    fn short_rows_yield_only_present_fields() {
        let row = vec!["123".to_string()];
        let record = Record::from_row(&headers(), &row);
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("ID"), Some("123"));
        assert_eq!(record.get("Correo"), None);
    }

    #[test]
    fn cells_beyond_headers_are_dropped() {
        let row = vec![
            "123".to_string(),
            "Ana".to_string(),
            "ana@example.com".to_string(),
            "extra".to_string(),
        ];
        let record = Record::from_row(&headers(), &row);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("extra"), None);
    }
}
