use std::path::Path;

use anyhow::Result;

pub mod csv;
pub mod infer;
pub mod xlsx;

/// Header row plus cell text, `None` for empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// A table read from a source file and the name it is listed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    pub name: String,
    pub table: RawTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<SourceFormat> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(SourceFormat::Workbook),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Workbook => "XLSX",
        }
    }
}

pub fn read_tables(path: &Path, format: SourceFormat) -> Result<Vec<SourceTable>> {
    match format {
        SourceFormat::Csv => {
            let table = self::csv::read_csv(path)?;
            Ok(vec![SourceTable {
                name: file_stem(path),
                table,
            }])
        }
        SourceFormat::Workbook => {
            let stem = file_stem(path);
            let sheets = self::xlsx::read_workbook(path)?;
            let multiple = sheets.len() > 1;
            Ok(sheets
                .into_iter()
                .map(|(sheet, table)| SourceTable {
                    name: if multiple {
                        format!("{stem} / {sheet}")
                    } else {
                        stem.clone()
                    },
                    table,
                })
                .collect())
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("dataset")
        .to_string()
}

/// Empty and whitespace-only cells are nulls.
pub(crate) fn normalize_cell(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Gives blank headers a positional name and suffixes repeats so every
/// column name is unique.
pub(crate) fn unique_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = match header.as_ref().trim() {
                "" => format!("column_{}", idx + 1),
                name => name.to_string(),
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_made_unique() {
        let headers = unique_headers(["id", "", "id", "name", "id"]);
        assert_eq!(headers, vec!["id", "column_2", "id_2", "name", "id_3"]);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a/b.CSV")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("book.xlsx")),
            Some(SourceFormat::Workbook)
        );
        assert_eq!(SourceFormat::from_path(Path::new("data.parquet")), None);
        assert_eq!(SourceFormat::from_path(Path::new("noext")), None);
    }
}
