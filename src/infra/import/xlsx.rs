use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use super::{normalize_cell, unique_headers, RawTable};
use crate::domain::entities::value::{DATE_FORMAT, TIMESTAMP_FORMAT};

/// Renders a workbook cell as import text; `None` for empty cells.
pub fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(v) => normalize_cell(v),
        Data::Float(v) => Some(v.to_string()),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        Data::DateTime(v) => match v.as_datetime() {
            Some(instant) if instant.time() == chrono::NaiveTime::MIN => {
                Some(instant.format(DATE_FORMAT).to_string())
            }
            Some(instant) => Some(instant.format(TIMESTAMP_FORMAT).to_string()),
            None => Some(v.to_string()),
        },
        Data::DateTimeIso(v) => normalize_cell(v),
        Data::DurationIso(v) => normalize_cell(v),
        Data::Error(v) => Some(format!("{v:?}")),
        Data::Empty => None,
    }
}

/// Reads every non-empty sheet; the first row of each sheet is its header.
pub fn read_workbook(xlsx_path: &Path) -> Result<Vec<(String, RawTable)>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open workbook: {}", xlsx_path.display()))?;

    let mut tables = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

        let mut sheet_rows = range.rows();
        let Some(header_row) = sheet_rows.next() else {
            continue;
        };
        let header_len = header_row.len();
        let headers = unique_headers(
            header_row
                .iter()
                .map(|cell| cell_to_text(cell).unwrap_or_default()),
        );

        let rows: Vec<Vec<Option<String>>> = sheet_rows
            .map(|row| {
                (0..header_len)
                    .map(|col_idx| row.get(col_idx).and_then(cell_to_text))
                    .collect::<Vec<_>>()
            })
            .filter(|row| row.iter().any(Option::is_some))
            .collect();

        tables.push((sheet_name, RawTable { headers, rows }));
    }

    if tables.is_empty() {
        anyhow::bail!("workbook has no non-empty sheets: {}", xlsx_path.display())
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_for_scalar_cells() {
        assert_eq!(cell_to_text(&Data::Float(3.0)), Some("3".to_string()));
        assert_eq!(cell_to_text(&Data::Float(2.25)), Some("2.25".to_string()));
        assert_eq!(cell_to_text(&Data::Int(-4)), Some("-4".to_string()));
        assert_eq!(cell_to_text(&Data::Bool(false)), Some("false".to_string()));
        assert_eq!(cell_to_text(&Data::String("  ".to_string())), None);
        assert_eq!(cell_to_text(&Data::Empty), None);
    }
}
