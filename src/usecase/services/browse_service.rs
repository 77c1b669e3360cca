use std::sync::Arc;

use crate::domain::entities::{FileId, FileMetadata, FileSummary, SortSpec};
use crate::domain::grid::collate;
use crate::usecase::ports::source::{DataSource, SourceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSortField {
    Name,
    Size,
    LastModified,
    RowCount,
}

impl FileSortField {
    pub const ALL: [FileSortField; 4] = [
        FileSortField::Name,
        FileSortField::Size,
        FileSortField::LastModified,
        FileSortField::RowCount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FileSortField::Name => "Name",
            FileSortField::Size => "Size",
            FileSortField::LastModified => "Modified",
            FileSortField::RowCount => "Rows",
        }
    }
}

pub type FileSort = SortSpec<FileSortField>;

/// The file list starts sorted by name, ascending.
pub fn default_file_sort() -> FileSort {
    FileSort::by(FileSortField::Name, Default::default())
}

pub struct BrowseService {
    source: Arc<dyn DataSource>,
}

impl BrowseService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    pub fn list_files(&self) -> Result<Vec<FileSummary>, SourceError> {
        let files = self.source.list_files()?;
        log::debug!("listed {} files", files.len());
        Ok(files)
    }

    pub fn file_metadata(&self, id: &FileId) -> Result<FileMetadata, SourceError> {
        self.source.file_metadata(id)
    }
}

/// Files whose name or path contains `query`, ignoring case.
pub fn search_files(files: &[FileSummary], query: &str) -> Vec<FileSummary> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return files.to_vec();
    }
    files
        .iter()
        .filter(|file| {
            file.name.to_lowercase().contains(&query) || file.path.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

pub fn sort_files(files: &mut [FileSummary], sort: &FileSort) {
    let Some(field) = sort.column else {
        return;
    };
    files.sort_by(|a, b| {
        let ascending = match field {
            FileSortField::Name => collate(&a.name, &b.name),
            FileSortField::Size => a.size.cmp(&b.size),
            FileSortField::LastModified => a.last_modified.cmp(&b.last_modified),
            FileSortField::RowCount => a.row_count.cmp(&b.row_count),
        };
        sort.direction.apply(ascending)
    });
}
