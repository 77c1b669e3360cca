use std::io::Write;

use anyhow::{Context, Result};

use crate::domain::entities::{CellValue, Page};

/// Appends `page` to `writer`, with a header row of column names when
/// `include_header` is set. Null cells become empty fields.
pub fn write_csv<W: Write>(
    writer: &mut csv::Writer<W>,
    page: &Page,
    include_header: bool,
) -> Result<usize> {
    if include_header {
        writer
            .write_record(page.column_names())
            .context("failed to write csv header")?;
    }

    for row in &page.rows {
        let record: Vec<String> = page
            .column_names()
            .map(|name| match Page::value(row, name) {
                CellValue::Null => String::new(),
                value => value.display().into_owned(),
            })
            .collect();
        writer
            .write_record(&record)
            .context("failed to write csv row")?;
    }

    Ok(page.rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Column, ColumnType, Row};

    #[test]
    fn writes_header_and_rendered_cells() {
        let columns = vec![
            Column::new("name", ColumnType::String),
            Column::new("qty", ColumnType::Integer),
        ];
        let rows: Vec<Row> = vec![
            Row::from([
                ("name".to_string(), CellValue::from("pen, blue")),
                ("qty".to_string(), CellValue::Integer(3)),
            ]),
            Row::from([("name".to_string(), CellValue::from("ink"))]),
        ];
        let page = Page::new(columns, rows, 2, 0, 10);

        let mut writer = csv::Writer::from_writer(Vec::new());
        let written = write_csv(&mut writer, &page, true).expect("csv write");
        assert_eq!(written, 2);

        let bytes = writer.into_inner().expect("flush csv");
        let text = String::from_utf8(bytes).expect("utf8 csv");
        assert_eq!(text, "name,qty\n\"pen, blue\",3\nink,\n");
    }
}
