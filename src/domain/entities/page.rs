use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::value::{CellValue, NULL_CELL};

/// One record, keyed by column name. Rows are never mutated once delivered.
pub type Row = BTreeMap<String, CellValue>;

/// One server-delivered batch of rows plus pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub total_rows: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl Page {
    pub fn new(
        columns: Vec<Column>,
        rows: Vec<Row>,
        total_rows: usize,
        current_page: usize,
        page_size: usize,
    ) -> Self {
        Self {
            columns,
            rows,
            total_rows,
            current_page,
            page_size,
        }
    }

    /// Parses the JSON page shape and coerces every cell to its column type.
    pub fn from_json(json: &str) -> serde_json::Result<Page> {
        let mut page: Page = serde_json::from_str(json)?;
        page.conform_rows();
        Ok(page)
    }

    /// Rewrites cells whose stored form does not match the declared column
    /// type (numbers or dates sent as text). Cells that cannot be coerced are
    /// left as they are.
    pub fn conform_rows(&mut self) {
        for column in &self.columns {
            for row in &mut self.rows {
                if let Some(value) = row.get_mut(&column.name) {
                    let conformed = value.conform(column.column_type).into_owned();
                    *value = conformed;
                }
            }
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Cell lookup where a missing entry reads as null.
    pub fn value<'a>(row: &'a Row, column: &str) -> &'a CellValue {
        row.get(column).unwrap_or(&NULL_CELL)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 1;
        }
        self.total_rows.div_ceil(self.page_size).max(1)
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page + 1 >= self.total_pages()
    }

    /// 1-based inclusive range of rows this page covers, `(0, 0)` when the
    /// source is empty.
    pub fn row_range(&self) -> (usize, usize) {
        if self.total_rows == 0 {
            return (0, 0);
        }
        let start = self.current_page * self.page_size + 1;
        let end = ((self.current_page + 1) * self.page_size).min(self.total_rows);
        (start.min(self.total_rows), end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::column::ColumnType;

    #[test]
    fn from_json_reads_remote_shape_and_conforms_cells() {
        let page = Page::from_json(
            r#"{
                "columns": [
                    {"name": "name", "type": "string", "nullable": false},
                    {"name": "score", "type": "integer", "nullable": true,
                     "statistics": {"nullCount": 1, "distinctCount": 2}}
                ],
                "rows": [
                    {"name": "Alpha", "score": "10"},
                    {"name": "Beta", "score": null}
                ],
                "totalRows": 2,
                "currentPage": 0,
                "pageSize": 50
            }"#,
        )
        .expect("page json should parse");

        assert_eq!(page.columns.len(), 2);
        assert_eq!(page.columns[1].column_type, ColumnType::Integer);
        assert_eq!(
            page.columns[1]
                .statistics
                .as_ref()
                .and_then(|stats| stats.null_count),
            Some(1)
        );
        assert_eq!(Page::value(&page.rows[0], "score"), &CellValue::Integer(10));
        assert_eq!(Page::value(&page.rows[1], "score"), &CellValue::Null);
        assert_eq!(Page::value(&page.rows[1], "missing"), &CellValue::Null);
    }

    #[test]
    fn pagination_helpers() {
        let page = Page::new(Vec::new(), Vec::new(), 120, 2, 50);
        assert_eq!(page.total_pages(), 3);
        assert!(page.is_last_page());
        assert!(!page.is_first_page());
        assert_eq!(page.row_range(), (101, 120));

        let first = Page::new(Vec::new(), Vec::new(), 120, 0, 50);
        assert_eq!(first.row_range(), (1, 50));
        assert!(!first.is_last_page());

        let empty = Page::new(Vec::new(), Vec::new(), 0, 0, 50);
        assert_eq!(empty.total_pages(), 1);
        assert_eq!(empty.row_range(), (0, 0));
        assert!(empty.is_last_page());
    }
}
