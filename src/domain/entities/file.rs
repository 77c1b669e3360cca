use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::column::Column;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for FileId {
    fn from(value: i64) -> Self {
        FileId(value.to_string())
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        FileId(value.to_string())
    }
}

impl From<String> for FileId {
    fn from(value: String) -> Self {
        FileId(value)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the file list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: FileId,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub column_count: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatistics {
    pub total_size: u64,
    pub average_row_size: f64,
}

impl FileStatistics {
    pub fn from_size(total_size: u64, row_count: usize) -> Self {
        let average_row_size = if row_count == 0 {
            0.0
        } else {
            total_size as f64 / row_count as f64
        };
        Self {
            total_size,
            average_row_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: FileId,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub format: String,
    pub compression: String,
    pub schema: Vec<Column>,
    pub row_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<FileStatistics>,
}

impl FileMetadata {
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            path: self.path.clone(),
            size: self.size,
            last_modified: self.last_modified,
            column_count: self.schema.len(),
            row_count: self.row_count,
        }
    }
}
