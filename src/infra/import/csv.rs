use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use super::{normalize_cell, unique_headers, RawTable};

pub fn read_csv(csv_path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    read_csv_from(file).with_context(|| format!("failed to read csv: {}", csv_path.display()))
}

pub fn read_csv_from<R: Read>(input: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader
        .headers()
        .context("failed to read csv headers")?
        .clone();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let header_len = headers.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let row = (0..header_len)
            .map(|col_idx| record.get(col_idx).and_then(normalize_cell))
            .collect();
        rows.push(row);
    }

    Ok(RawTable {
        headers: unique_headers(headers.iter()),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_records_are_padded_with_nulls() {
        let input = "name,score,note\nAlpha,7\nBeta,9,ok,extra\n";
        let table = read_csv_from(input.as_bytes()).expect("csv should parse");

        assert_eq!(table.headers, vec!["name", "score", "note"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Some("Alpha".to_string()), Some("7".to_string()), None],
                vec![
                    Some("Beta".to_string()),
                    Some("9".to_string()),
                    Some("ok".to_string())
                ],
            ]
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = read_csv_from("".as_bytes()).expect_err("empty csv should fail");
        assert!(
            err.to_string().contains("csv header is required"),
            "unexpected error: {err:#}"
        );
    }
}
