use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS dataset (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            source_path   TEXT NOT NULL,
            format        TEXT NOT NULL,
            size_bytes    INTEGER NOT NULL,
            row_count     INTEGER NOT NULL,
            last_modified TEXT NOT NULL,
            imported_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS column_meta (
            dataset_id     INTEGER NOT NULL,
            col_idx        INTEGER NOT NULL,
            name           TEXT NOT NULL,
            col_type       TEXT NOT NULL,
            nullable       INTEGER NOT NULL,
            null_count     INTEGER,
            distinct_count INTEGER,
            min_value      TEXT,
            max_value      TEXT,
            PRIMARY KEY (dataset_id, col_idx),
            FOREIGN KEY (dataset_id) REFERENCES dataset(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS cell (
            dataset_id  INTEGER NOT NULL,
            row_idx     INTEGER NOT NULL,
            col_idx     INTEGER NOT NULL,
            value       TEXT,
            PRIMARY KEY (dataset_id, row_idx, col_idx),
            FOREIGN KEY (dataset_id) REFERENCES dataset(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_cell_dataset_row
            ON cell(dataset_id, row_idx);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("nested").join("grid.db");

        init_db(&db_path).expect("first init");
        init_db(&db_path).expect("second init");

        let conn = open_connection(&db_path).expect("open db");
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('dataset', 'column_meta', 'cell')",
                [],
                |row| row.get(0),
            )
            .expect("count tables");
        assert_eq!(tables, 3);
    }
}
