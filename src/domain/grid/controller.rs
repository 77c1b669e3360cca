//! Grid state controller.
//!
//! Owns the sort, filter and column visibility state of one rendered grid and
//! keeps the derived (filtered, then sorted) row view in step with it. Every
//! setter recomputes the view before returning, so a reader never observes a
//! view built from a stale combination of inputs.
//!
//! Filtering and sorting only ever see the rows of the page currently loaded.
//! Moving to another page or changing the page size is a refetch done by the
//! host, which then hands the new page to [`GridController::set_page`].

use std::borrow::Cow;

use crate::domain::entities::{CellValue, Column, Page, Row, SortSpec};
use crate::domain::grid::kernel::{compare, FilterQuery};
use crate::domain::grid::visibility::VisibleColumns;

#[derive(Debug, Clone, Default)]
pub struct GridController {
    page: Option<Page>,
    sort: SortSpec,
    filter: String,
    visible: VisibleColumns,
    view: Vec<usize>,
}

impl GridController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(page: Page) -> Self {
        let mut controller = Self::new();
        controller.set_page(page);
        controller
    }

    /// Replaces the current page wholesale. Sort, filter and visibility
    /// survive; columns seen for the first time become visible.
    pub fn set_page(&mut self, page: Page) {
        self.visible.seed(page.column_names());
        self.page = Some(page);
        self.recompute();
    }

    pub fn clear_page(&mut self) {
        self.page = None;
        self.recompute();
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.recompute();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Sorts by `column`, flipping direction if it is already the sort column.
    /// Returns false, changing nothing, for a column the page does not have.
    pub fn sort_by(&mut self, column: &str) -> bool {
        if !self.has_column(column) {
            return false;
        }
        self.sort.toggle(column.to_string());
        self.recompute();
        true
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Flips visibility of `column` and returns whether it is now visible.
    ///
    /// Hiding the last visible column is allowed; renderers show an empty
    /// state for an empty set. Unknown columns are ignored.
    pub fn toggle_column(&mut self, column: &str) -> bool {
        if !self.has_column(column) {
            return false;
        }
        let now_visible = self.visible.toggle(column);
        self.recompute();
        now_visible
    }

    pub fn visible_set(&self) -> &VisibleColumns {
        &self.visible
    }

    pub fn is_column_visible(&self, column: &str) -> bool {
        self.has_column(column) && self.visible.contains(column)
    }

    /// Visible columns of the current page, in page order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.page
            .iter()
            .flat_map(|page| page.columns.iter())
            .filter(|column| self.visible.contains(&column.name))
            .collect()
    }

    pub fn derived_rows(&self) -> Vec<&Row> {
        match &self.page {
            Some(page) => self.view.iter().map(|&idx| &page.rows[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Positions of the derived rows within the current page.
    pub fn derived_indices(&self) -> &[usize] {
        &self.view
    }

    /// Number of rows on this page that pass the filter.
    pub fn filtered_count(&self) -> usize {
        self.view.len()
    }

    fn has_column(&self, column: &str) -> bool {
        self.page
            .as_ref()
            .is_some_and(|page| page.has_column(column))
    }

    fn recompute(&mut self) {
        self.view = match &self.page {
            Some(page) => derive_view(page, &self.filter, &self.sort),
            None => Vec::new(),
        };
    }
}

/// Filters `page` by `filter`, then stable-sorts the survivors by `sort`.
///
/// Returns row positions into `page.rows`; ties keep delivery order.
pub fn derive_view(page: &Page, filter: &str, sort: &SortSpec) -> Vec<usize> {
    let query = FilterQuery::new(filter);
    let mut indices: Vec<usize> = page
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| query.matches(row))
        .map(|(idx, _)| idx)
        .collect();

    if let Some(column) = sort.column_name() {
        let column_type = page.column(column).map(|c| c.column_type);
        let mut keyed: Vec<(usize, Cow<'_, CellValue>)> = indices
            .into_iter()
            .map(|idx| {
                let value = Page::value(&page.rows[idx], column);
                let key = match column_type {
                    Some(ty) => value.conform(ty),
                    None => Cow::Borrowed(value),
                };
                (idx, key)
            })
            .collect();
        keyed.sort_by(|(_, left), (_, right)| compare(left, right, sort.direction));
        indices = keyed.into_iter().map(|(idx, _)| idx).collect();
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ColumnType, SortDirection};
    use chrono::NaiveDate;

    fn row(entries: &[(&str, CellValue)]) -> Row {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    fn nv_page() -> Page {
        Page::new(
            vec![
                Column::new("n", ColumnType::String),
                Column::new("v", ColumnType::Integer),
            ],
            vec![
                row(&[("n", "b".into()), ("v", 2.into())]),
                row(&[("n", "a".into()), ("v", 1.into())]),
                row(&[("n", "c".into()), ("v", 1.into())]),
            ],
            3,
            0,
            50,
        )
    }

    fn names(controller: &GridController) -> Vec<String> {
        controller
            .derived_rows()
            .iter()
            .map(|row| Page::value(row, "n").display().into_owned())
            .collect()
    }

    #[test]
    fn unsorted_view_keeps_delivery_order() {
        let controller = GridController::with_page(nv_page());
        assert_eq!(names(&controller), vec!["b", "a", "c"]);
        assert_eq!(controller.sort().column, None);
    }

    #[test]
    fn filter_then_sort_is_stable() {
        let mut controller = GridController::with_page(nv_page());
        controller.set_filter("");
        assert!(controller.sort_by("v"));

        assert_eq!(names(&controller), vec!["a", "c", "b"]);
    }

    #[test]
    fn sorting_twice_with_same_spec_is_idempotent() {
        let page = nv_page();
        let spec = SortSpec::by("v".to_string(), SortDirection::Desc);
        let once = derive_view(&page, "", &spec);
        let again = derive_view(&page, "", &spec);
        assert_eq!(once, again);
        assert_eq!(once, vec![0, 1, 2]);
    }

    #[test]
    fn filter_narrows_before_sorting() {
        let mut controller = GridController::with_page(nv_page());
        controller.sort_by("n");
        controller.set_filter("  B ");

        assert_eq!(names(&controller), vec!["b"]);
        assert_eq!(controller.filtered_count(), 1);
    }

    #[test]
    fn sort_toggle_flips_and_resets() {
        let mut controller = GridController::with_page(nv_page());

        controller.sort_by("v");
        assert_eq!(controller.sort().direction, SortDirection::Asc);
        controller.sort_by("v");
        assert_eq!(controller.sort().direction, SortDirection::Desc);
        controller.sort_by("v");
        assert_eq!(controller.sort().direction, SortDirection::Asc);

        controller.sort_by("v");
        controller.sort_by("n");
        assert_eq!(
            controller.sort(),
            &SortSpec::by("n".to_string(), SortDirection::Asc)
        );
    }

    #[test]
    fn unknown_columns_are_inert() {
        let mut controller = GridController::with_page(nv_page());

        assert!(!controller.sort_by("missing"));
        assert!(!controller.toggle_column("missing"));
        assert_eq!(controller.sort().column, None);
        assert_eq!(controller.visible_columns().len(), 2);
    }

    #[test]
    fn hiding_every_column_is_allowed_and_sticks() {
        let mut controller = GridController::with_page(nv_page());
        controller.toggle_column("n");
        controller.toggle_column("v");
        assert!(controller.visible_columns().is_empty());

        controller.set_page(nv_page());
        assert!(controller.visible_columns().is_empty());
        assert_eq!(controller.derived_rows().len(), 3);
    }

    #[test]
    fn column_toggle_round_trip() {
        let mut controller = GridController::with_page(nv_page());
        let before: Vec<String> = controller.visible_set().names().map(String::from).collect();

        assert!(!controller.toggle_column("v"));
        assert!(!controller.is_column_visible("v"));
        assert!(controller.toggle_column("v"));

        let after: Vec<String> = controller.visible_set().names().map(String::from).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn page_replacement_keeps_sort_and_filter() {
        let mut controller = GridController::with_page(nv_page());
        controller.sort_by("v");
        controller.sort_by("v");
        controller.set_filter("a");

        let next = Page::new(
            vec![Column::new("n", ColumnType::String)],
            vec![
                row(&[("n", "alpha".into())]),
                row(&[("n", "zeta".into())]),
                row(&[("n", "gamma".into())]),
            ],
            6,
            1,
            3,
        );
        controller.set_page(next);

        assert_eq!(
            controller.sort(),
            &SortSpec::by("v".to_string(), SortDirection::Desc)
        );
        assert_eq!(controller.filter(), "a");
        assert!(controller.visible_set().contains("v"));
        assert!(!controller.is_column_visible("v"));

        let visible: Vec<&str> = controller
            .visible_columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(visible, vec!["n"]);
        assert_eq!(names(&controller), vec!["alpha", "zeta", "gamma"]);
    }

    #[test]
    fn null_sort_values_follow_direction() {
        let page = Page::new(
            vec![Column::new("x", ColumnType::Double)],
            vec![
                row(&[("x", CellValue::Null)]),
                row(&[("x", 5.into())]),
                row(&[]),
                row(&[("x", 2.into())]),
            ],
            4,
            0,
            10,
        );
        let mut controller = GridController::with_page(page);

        controller.sort_by("x");
        assert_eq!(controller.derived_indices(), &[0, 2, 3, 1]);
        controller.sort_by("x");
        assert_eq!(controller.derived_indices(), &[1, 3, 0, 2]);
    }

    #[test]
    fn textual_numbers_in_typed_column_sort_by_value() {
        let page = Page::new(
            vec![
                Column::new("n", ColumnType::String),
                Column::new("v", ColumnType::Integer),
            ],
            vec![
                row(&[("n", "nine".into()), ("v", "9".into())]),
                row(&[("n", "ten".into()), ("v", "10".into())]),
                row(&[("n", "two".into()), ("v", 2.into())]),
                row(&[("n", "none".into())]),
            ],
            4,
            0,
            10,
        );
        let mut controller = GridController::with_page(page);

        controller.sort_by("v");
        assert_eq!(names(&controller), vec!["none", "two", "nine", "ten"]);
        controller.sort_by("v");
        assert_eq!(names(&controller), vec!["ten", "nine", "two", "none"]);
    }

    #[test]
    fn filter_matches_rendered_numbers_dates_and_booleans() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date");
        let instant = day.and_hms_opt(9, 30, 0).expect("valid time");
        let page = Page::new(
            vec![
                Column::new("n", ColumnType::String),
                Column::new("price", ColumnType::Double),
                Column::new("day", ColumnType::Date),
                Column::new("at", ColumnType::Timestamp),
                Column::new("ok", ColumnType::Boolean),
            ],
            vec![
                row(&[
                    ("n", "typed".into()),
                    ("price", CellValue::Double(2.5)),
                    ("day", CellValue::Date(day)),
                    ("at", CellValue::Timestamp(instant)),
                    ("ok", CellValue::Bool(true)),
                ]),
                row(&[("n", "other".into()), ("price", CellValue::Double(7.0))]),
            ],
            2,
            0,
            10,
        );
        let mut controller = GridController::with_page(page);

        for query in ["2.5", "2024-01-05", "09:30", "TRUE"] {
            controller.set_filter(query);
            assert_eq!(names(&controller), vec!["typed"], "query {query:?}");
        }

        controller.set_filter("7.0");
        assert!(controller.derived_rows().is_empty());
        controller.set_filter("7");
        assert_eq!(names(&controller), vec!["other"]);
    }

    #[test]
    fn no_page_means_empty_view() {
        let mut controller = GridController::new();
        controller.set_filter("x");
        assert!(controller.derived_rows().is_empty());
        assert!(controller.visible_columns().is_empty());

        controller.set_page(nv_page());
        controller.clear_page();
        assert!(controller.derived_rows().is_empty());
    }
}
