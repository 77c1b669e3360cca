use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, RowNum, Worksheet};

use crate::domain::entities::{CellValue, Page};

/// Writes `page` into `worksheet` from `next_row` down, with a header row of
/// column names when `include_header` is set. Null cells are left blank.
///
/// Returns the first row after the written block.
pub fn write_xlsx(
    worksheet: &mut Worksheet,
    page: &Page,
    mut next_row: RowNum,
    include_header: bool,
) -> Result<RowNum> {
    let names: Vec<&str> = page.column_names().collect();

    if include_header {
        for (col_idx, name) in names.iter().enumerate() {
            worksheet
                .write_string(next_row, column_number(col_idx)?, *name)
                .context("failed to write xlsx header")?;
        }
        next_row += 1;
    }

    for row in &page.rows {
        for (col_idx, name) in names.iter().enumerate() {
            let text = match Page::value(row, name) {
                CellValue::Null => continue,
                value => value.display(),
            };
            worksheet
                .write_string(next_row, column_number(col_idx)?, &*text)
                .with_context(|| format!("failed to write xlsx row {next_row}"))?;
        }
        next_row += 1;
    }

    Ok(next_row)
}

fn column_number(col_idx: usize) -> Result<ColNum> {
    ColNum::try_from(col_idx).with_context(|| format!("too many columns for xlsx: {col_idx}"))
}
