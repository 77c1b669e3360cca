use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::FileId;
use crate::infra::import::infer::infer_table;
use crate::infra::import::{read_tables, SourceFormat};
use crate::usecase::ports::source::{Catalog, NewFileMeta, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub file_id: FileId,
    pub name: String,
    pub row_count: usize,
}

pub struct ImportService {
    catalog: Arc<dyn Catalog>,
}

impl ImportService {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Imports a CSV file, or every non-empty sheet of a workbook, as one
    /// catalog file per table.
    pub fn import_path(&self, path: &Path) -> Result<Vec<ImportResult>, SourceError> {
        let format = SourceFormat::from_path(path).ok_or_else(|| {
            SourceError::InvalidRequest(format!("unsupported file type: {}", path.display()))
        })?;
        let tables = read_tables(path, format).map_err(SourceError::import)?;

        let metadata = std::fs::metadata(path)
            .map_err(|err| SourceError::Import(format!("{}: {err}", path.display())))?;
        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let source_path = path.to_string_lossy().into_owned();

        let mut results = Vec::with_capacity(tables.len());
        for table in tables {
            let data = infer_table(table.table);
            let row_count = data.rows.len();
            let meta = NewFileMeta {
                name: table.name.clone(),
                source_path: source_path.clone(),
                format: format.label().to_string(),
                size: metadata.len(),
                last_modified,
            };
            let file_id = self.catalog.create_file(meta, data)?;
            log::info!(
                "imported {} ({row_count} rows) from {} as file {file_id}",
                table.name,
                path.display()
            );
            results.push(ImportResult {
                file_id,
                name: table.name,
                row_count,
            });
        }

        Ok(results)
    }

    pub fn remove(&self, id: &FileId) -> Result<(), SourceError> {
        self.catalog.remove_file(id)?;
        log::info!("removed file {id}");
        Ok(())
    }
}
