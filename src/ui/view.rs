//! Text the grid and file pages render, kept free of any UI framework so it
//! can be tested directly.

use chrono::{DateTime, Utc};

use crate::domain::entities::{CellValue, Page, SortDirection, SortSpec};
use crate::domain::grid::GridController;

pub use crate::usecase::services::view_service::PAGE_SIZE_OPTIONS;

/// Shown next to the search box and the page controls.
pub const PAGE_SCOPE_HINT: &str =
    "Search and sort apply to the rows on this page only. Change page or page size to load other rows.";

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn cell_text(value: &CellValue) -> String {
    value.display().into_owned()
}

pub fn sort_indicator(sort: &SortSpec, column: &str) -> &'static str {
    if sort.column.as_deref() != Some(column) {
        return "";
    }
    match sort.direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    }
}

pub fn footer_summary(page: &Page) -> String {
    let (start, end) = page.row_range();
    format!("Showing {start} to {end} of {} rows", page.total_rows)
}

pub fn page_label(page: &Page) -> String {
    format!("Page {} of {}", page.current_page + 1, page.total_pages())
}

/// Human readable size with 1024-based units, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format(DISPLAY_TIME_FORMAT).to_string()
}

/// Message for a grid with nothing to draw, `None` when rows are visible.
pub fn empty_state_message(grid: &GridController) -> Option<&'static str> {
    let page = grid.page()?;
    if page.is_empty() {
        Some("No data available for this file")
    } else if grid.visible_columns().is_empty() {
        Some("All columns are hidden. Use the column menu to show some.")
    } else if grid.filtered_count() == 0 {
        Some("No rows on this page match the search")
    } else {
        None
    }
}
