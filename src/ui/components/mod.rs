pub mod file_explorer;
pub mod file_metadata;
pub mod grid_table;

pub use file_explorer::FileExplorer;
pub use file_metadata::FileMetadataPanel;
pub use grid_table::GridTable;

pub(crate) const BUTTON_STYLE: &str =
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";
pub(crate) const ACTIVE_BUTTON_STYLE: &str =
    "border: 1px solid #4c6ef5; background: #eef4ff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";
