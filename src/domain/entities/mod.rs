pub mod column;
pub mod file;
pub mod grid;
pub mod page;
pub mod value;

pub use column::{Column, ColumnStatistics, ColumnType};
pub use file::{FileId, FileMetadata, FileStatistics, FileSummary};
pub use grid::{SortDirection, SortSpec};
pub use page::{Page, Row};
pub use value::CellValue;
