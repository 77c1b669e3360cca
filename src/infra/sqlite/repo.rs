use std::path::PathBuf;

use crate::domain::entities::{FileId, FileMetadata, FileSummary, Page};
use crate::infra::sqlite::queries::{
    create_file_from_table, fetch_page, list_files, load_file_meta, remove_file,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::source::{Catalog, DataSource, NewFileMeta, SourceError, TabularData};

/// Catalog database that serves files page by page.
pub struct SqliteSource {
    pub db_path: PathBuf,
}

impl SqliteSource {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// Ids this source hands out are row ids; anything else names no file.
fn dataset_id(id: &FileId) -> Result<i64, SourceError> {
    id.as_str()
        .parse::<i64>()
        .map_err(|_| SourceError::NotFound(id.clone()))
}

impl DataSource for SqliteSource {
    fn list_files(&self) -> Result<Vec<FileSummary>, SourceError> {
        list_files(&self.db_path).map_err(SourceError::storage)
    }

    fn file_metadata(&self, id: &FileId) -> Result<FileMetadata, SourceError> {
        load_file_meta(&self.db_path, dataset_id(id)?)
            .map_err(SourceError::storage)?
            .ok_or_else(|| SourceError::NotFound(id.clone()))
    }

    fn fetch_page(
        &self,
        id: &FileId,
        page: usize,
        page_size: usize,
    ) -> Result<Page, SourceError> {
        if page_size == 0 {
            return Err(SourceError::InvalidRequest(
                "page size must be greater than zero".to_string(),
            ));
        }
        fetch_page(&self.db_path, dataset_id(id)?, page, page_size)
            .map_err(SourceError::storage)?
            .ok_or_else(|| SourceError::NotFound(id.clone()))
    }
}

impl Catalog for SqliteSource {
    fn init(&self) -> Result<(), SourceError> {
        init_db(&self.db_path).map_err(SourceError::storage)
    }

    fn create_file(&self, meta: NewFileMeta, data: TabularData) -> Result<FileId, SourceError> {
        let dataset_id =
            create_file_from_table(&self.db_path, &meta, &data).map_err(SourceError::storage)?;
        Ok(FileId::from(dataset_id))
    }

    fn remove_file(&self, id: &FileId) -> Result<(), SourceError> {
        if remove_file(&self.db_path, dataset_id(id)?).map_err(SourceError::storage)? {
            Ok(())
        } else {
            Err(SourceError::NotFound(id.clone()))
        }
    }
}
