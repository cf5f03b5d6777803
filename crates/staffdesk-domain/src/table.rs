//! Tabular values extracted from documents.

/// A table pulled out of a tabular document.
///
/// The first row of the raw extraction becomes the header, the remaining
/// rows become data. Rows are not required to have the same width as the
/// header; consumers render what is there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column headers, in document order.
    pub headers: Vec<String>,
    /// Data rows, in document order.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from a raw row block: first row header, rest data.
    ///
    /// Returns `None` when `raw` is empty (a header-less table does not
    /// exist in this model).
    pub fn from_raw(mut raw: Vec<Vec<String>>) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let headers = raw.remove(0);
        Some(Self { headers, rows: raw })
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns in the header row.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_from_raw_splits_header() {
        let table = Table::from_raw(vec![
            row(&["Name", "Role"]),
            row(&["Alice", "Engineer"]),
            row(&["Bob", "Analyst"]),
        ])
        .unwrap();

        assert_eq!(table.headers, row(&["Name", "Role"]));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_from_raw_empty_is_none() {
        assert!(Table::from_raw(Vec::new()).is_none());
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let table = Table::from_raw(vec![row(&["Name", "Role"])]).unwrap();
        assert!(table.is_empty());
    }
}
