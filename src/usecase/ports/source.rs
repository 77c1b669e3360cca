use chrono::{DateTime, Utc};

use crate::domain::entities::{Column, FileId, FileMetadata, FileSummary, Page};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("file not found: {0}")]
    NotFound(FileId),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("import failed: {0}")]
    Import(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl SourceError {
    pub fn storage(err: anyhow::Error) -> Self {
        SourceError::Storage(format!("{err:#}"))
    }

    pub fn import(err: anyhow::Error) -> Self {
        SourceError::Import(format!("{err:#}"))
    }

    pub fn export(err: anyhow::Error) -> Self {
        SourceError::Export(format!("{err:#}"))
    }
}

/// Read side of the data source: what the browsing UI and the grid host consume.
pub trait DataSource: Send + Sync {
    fn list_files(&self) -> Result<Vec<FileSummary>, SourceError>;
    fn file_metadata(&self, id: &FileId) -> Result<FileMetadata, SourceError>;
    fn fetch_page(&self, id: &FileId, page: usize, page_size: usize)
        -> Result<Page, SourceError>;
}

/// Write side: registering and removing files.
pub trait Catalog: Send + Sync {
    fn init(&self) -> Result<(), SourceError>;
    fn create_file(&self, meta: NewFileMeta, data: TabularData) -> Result<FileId, SourceError>;
    fn remove_file(&self, id: &FileId) -> Result<(), SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileMeta {
    pub name: String,
    pub source_path: String,
    pub format: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// A decoded table ready to be stored: typed columns plus raw cell text,
/// `None` for empty cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularData {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Option<String>>>,
}
