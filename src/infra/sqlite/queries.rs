use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Value, Connection, OptionalExtension};

use crate::domain::entities::{
    CellValue, Column, ColumnStatistics, ColumnType, FileId, FileMetadata, FileStatistics,
    FileSummary, Page, Row,
};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::source::{NewFileMeta, TabularData};

/// Datasets live in the catalog database itself, uncompressed.
const STORED_COMPRESSION: &str = "none";

fn parse_stored_time(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .map(|naive| naive.and_utc())
        })
        .unwrap_or_else(|err| {
            log::warn!("unreadable stored timestamp {text:?}: {err}");
            DateTime::default()
        })
}

fn stat_text(value: &Option<CellValue>) -> Option<String> {
    value
        .as_ref()
        .filter(|value| !value.is_null())
        .map(|value| value.display().into_owned())
}

pub fn insert_columns(
    tx: &rusqlite::Transaction<'_>,
    dataset_id: i64,
    columns: &[Column],
) -> Result<()> {
    let mut insert_column = tx
        .prepare(
            "INSERT INTO column_meta(
                dataset_id, col_idx, name, col_type, nullable,
                null_count, distinct_count, min_value, max_value
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .context("failed to prepare column insert")?;

    for (col_idx, column) in columns.iter().enumerate() {
        let stats = column.statistics.clone().unwrap_or_default();
        insert_column
            .execute(params![
                dataset_id,
                col_idx as i64,
                column.name,
                column.column_type.as_str(),
                column.nullable as i64,
                stats.null_count.map(|count| count as i64),
                stats.distinct_count.map(|count| count as i64),
                stat_text(&stats.min),
                stat_text(&stats.max),
            ])
            .context("failed to insert column")?;
    }

    Ok(())
}

pub fn create_file_from_table(
    db_path: &Path,
    meta: &NewFileMeta,
    data: &TabularData,
) -> Result<i64> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start dataset create transaction")?;

    tx.execute(
        "INSERT INTO dataset(
            name, source_path, format, size_bytes, row_count, last_modified, imported_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            meta.name,
            meta.source_path,
            meta.format,
            meta.size as i64,
            data.rows.len() as i64,
            meta.last_modified.to_rfc3339(),
            Utc::now().to_rfc3339(),
        ],
    )
    .context("failed to insert dataset")?;
    let dataset_id = tx.last_insert_rowid();

    insert_columns(&tx, dataset_id, &data.columns)?;

    let mut insert_cell = tx
        .prepare("INSERT INTO cell(dataset_id, row_idx, col_idx, value) VALUES (?1, ?2, ?3, ?4)")
        .context("failed to prepare cell insert")?;
    for (row_idx, row) in data.rows.iter().enumerate() {
        for col_idx in 0..data.columns.len() {
            let value = row.get(col_idx).cloned().flatten();
            insert_cell
                .execute(params![dataset_id, row_idx as i64, col_idx as i64, value])
                .context("failed to insert dataset cell")?;
        }
    }
    drop(insert_cell);

    tx.commit().context("failed to commit dataset create")?;
    Ok(dataset_id)
}

pub fn list_files(db_path: &Path) -> Result<Vec<FileSummary>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT d.id, d.name, d.source_path, d.size_bytes, d.last_modified, d.row_count,
                    (SELECT COUNT(*) FROM column_meta c WHERE c.dataset_id = d.id)
             FROM dataset d
             ORDER BY d.id DESC",
        )
        .context("failed to prepare datasets query")?;

    let files = stmt
        .query_map([], |row| {
            Ok(FileSummary {
                id: row.get::<_, i64>(0)?.into(),
                name: row.get(1)?,
                path: row.get(2)?,
                size: row.get::<_, i64>(3)?.max(0) as u64,
                last_modified: parse_stored_time(&row.get::<_, String>(4)?),
                row_count: row.get::<_, i64>(5)?.max(0) as usize,
                column_count: row.get::<_, i64>(6)?.max(0) as usize,
            })
        })
        .context("failed to query datasets")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect datasets")?;

    Ok(files)
}

pub fn load_columns(conn: &Connection, dataset_id: i64) -> Result<Vec<Column>> {
    let mut stmt = conn
        .prepare(
            "SELECT name, col_type, nullable, null_count, distinct_count, min_value, max_value
             FROM column_meta
             WHERE dataset_id = ?1
             ORDER BY col_idx ASC",
        )
        .context("failed to prepare columns query")?;

    let columns = stmt
        .query_map([dataset_id], |row| {
            let name: String = row.get(0)?;
            let column_type = ColumnType::from_tag(&row.get::<_, String>(1)?);
            let nullable: i64 = row.get(2)?;
            let null_count: Option<i64> = row.get(3)?;
            let distinct_count: Option<i64> = row.get(4)?;
            let min_value: Option<String> = row.get(5)?;
            let max_value: Option<String> = row.get(6)?;

            let statistics = ColumnStatistics {
                min: min_value.map(|text| CellValue::parse_as(&text, column_type)),
                max: max_value.map(|text| CellValue::parse_as(&text, column_type)),
                null_count: null_count.map(|count| count.max(0) as u64),
                distinct_count: distinct_count.map(|count| count.max(0) as u64),
            };
            Ok(Column::new(name, column_type)
                .nullable(nullable != 0)
                .with_statistics(statistics))
        })
        .context("failed to query columns")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect columns")?;

    Ok(columns)
}

pub fn load_file_meta(db_path: &Path, dataset_id: i64) -> Result<Option<FileMetadata>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;

    let header = conn
        .query_row(
            "SELECT name, source_path, format, size_bytes, row_count, last_modified, imported_at
             FROM dataset
             WHERE id = ?1",
            [dataset_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            },
        )
        .optional()
        .context("failed to query dataset")?;

    let Some((name, path, format, size, row_count, last_modified, imported_at)) = header else {
        return Ok(None);
    };

    let size = size.max(0) as u64;
    let row_count = row_count.max(0) as usize;
    Ok(Some(FileMetadata {
        id: FileId::from(dataset_id),
        name,
        path,
        size,
        last_modified: parse_stored_time(&last_modified),
        created_at: parse_stored_time(&imported_at),
        format,
        compression: STORED_COMPRESSION.to_string(),
        schema: load_columns(&conn, dataset_id)?,
        row_count,
        statistics: Some(FileStatistics::from_size(size, row_count)),
    }))
}

/// Reads rows `page * page_size ..` of a dataset. `None` when the dataset
/// does not exist; pages past the end come back empty.
pub fn fetch_page(
    db_path: &Path,
    dataset_id: i64,
    page: usize,
    page_size: usize,
) -> Result<Option<Page>> {
    if page_size == 0 {
        anyhow::bail!("page_size must be greater than zero")
    }

    init_db(db_path)?;
    let conn = open_connection(db_path)?;

    let row_count: Option<i64> = conn
        .query_row(
            "SELECT row_count FROM dataset WHERE id = ?1",
            [dataset_id],
            |row| row.get(0),
        )
        .optional()
        .context("failed to query dataset row_count")?;
    let Some(row_count) = row_count else {
        return Ok(None);
    };
    let total_rows = row_count.max(0) as usize;

    let columns = load_columns(&conn, dataset_id)?;
    let offset = page.saturating_mul(page_size);
    if columns.is_empty() || offset >= total_rows {
        return Ok(Some(Page::new(columns, Vec::new(), total_rows, page, page_size)));
    }

    let mut row_stmt = conn
        .prepare(
            "SELECT DISTINCT row_idx
             FROM cell
             WHERE dataset_id = ?1
             ORDER BY row_idx ASC
             LIMIT ?2 OFFSET ?3",
        )
        .context("failed to prepare page row_idx query")?;
    let row_indices = row_stmt
        .query_map(
            params![dataset_id, page_size as i64, offset as i64],
            |row| row.get::<_, i64>(0),
        )
        .context("failed to query page row_idx")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect page row_idx")?;
    drop(row_stmt);

    if row_indices.is_empty() {
        return Ok(Some(Page::new(columns, Vec::new(), total_rows, page, page_size)));
    }

    let placeholders = std::iter::repeat_n("?", row_indices.len())
        .collect::<Vec<_>>()
        .join(",");
    let hydrate_sql = format!(
        "SELECT row_idx, col_idx, value
         FROM cell
         WHERE dataset_id = ? AND row_idx IN ({placeholders})
         ORDER BY row_idx ASC, col_idx ASC"
    );
    let mut hydrate_params = vec![Value::Integer(dataset_id)];
    hydrate_params.extend(row_indices.iter().copied().map(Value::Integer));

    let mut rows = vec![Row::new(); row_indices.len()];
    let row_pos: HashMap<i64, usize> = row_indices
        .iter()
        .copied()
        .enumerate()
        .map(|(idx, row_idx)| (row_idx, idx))
        .collect();

    let mut hydrate_stmt = conn
        .prepare(&hydrate_sql)
        .context("failed to prepare row hydration query")?;
    let mut hydrate_rows = hydrate_stmt
        .query(rusqlite::params_from_iter(hydrate_params))
        .context("failed to run row hydration query")?;

    while let Some(row) = hydrate_rows.next().context("failed to read hydrated row")? {
        let row_idx: i64 = row.get(0).context("failed to read row_idx")?;
        let col_idx: i64 = row.get(1).context("failed to read col_idx")?;
        let value: Option<String> = row.get(2).context("failed to read value")?;

        let Some(column) = usize::try_from(col_idx)
            .ok()
            .and_then(|col_idx| columns.get(col_idx))
        else {
            continue;
        };
        if let Some(dest_row) = row_pos.get(&row_idx).and_then(|&pos| rows.get_mut(pos)) {
            let cell = match value {
                Some(text) => CellValue::parse_as(&text, column.column_type),
                None => CellValue::Null,
            };
            dest_row.insert(column.name.clone(), cell);
        }
    }

    Ok(Some(Page::new(columns, rows, total_rows, page, page_size)))
}

/// Deletes a dataset with its columns and cells. Returns whether it existed.
pub fn remove_file(db_path: &Path, dataset_id: i64) -> Result<bool> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start remove transaction")?;
    tx.execute(
        "DELETE FROM cell WHERE dataset_id = ?1",
        params![dataset_id],
    )
    .with_context(|| format!("failed to delete cells for dataset #{dataset_id}"))?;
    tx.execute(
        "DELETE FROM column_meta WHERE dataset_id = ?1",
        params![dataset_id],
    )
    .with_context(|| format!("failed to delete columns for dataset #{dataset_id}"))?;
    let removed = tx
        .execute("DELETE FROM dataset WHERE id = ?1", params![dataset_id])
        .with_context(|| format!("failed to delete dataset #{dataset_id}"))?;
    tx.commit().context("failed to commit remove transaction")?;
    Ok(removed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_times_parse_or_fall_back_to_the_epoch() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|day| day.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
            .and_utc();

        assert_eq!(parse_stored_time("2024-03-01T12:00:00+00:00"), expected);
        assert_eq!(parse_stored_time("2024-03-01 12:00:00"), expected);
        assert_eq!(parse_stored_time("not a time"), DateTime::<Utc>::default());
    }
}
