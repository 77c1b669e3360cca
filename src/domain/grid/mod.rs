pub mod controller;
pub mod kernel;
pub mod visibility;

pub use controller::{derive_view, GridController};
pub use kernel::{collate, compare, compare_as, matches, FilterQuery};
pub use visibility::VisibleColumns;
