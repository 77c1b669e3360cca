//! Comparator and filter kernel.
//!
//! Pure functions over [`CellValue`]s: a total order for sorting a column in
//! either direction and a case-insensitive substring predicate over a row.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};

use crate::domain::entities::{CellValue, ColumnType, Row, SortDirection};

/// Compares two cells for `direction`.
///
/// Nulls sit at the low end: first when ascending, last when descending.
/// Numbers compare numerically, dates by instant, anything else (including
/// mixed tags) by [`collate`] over the rendered text.
pub fn compare(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    direction.apply(compare_ascending(a, b))
}

/// Like [`compare`], but first coerces both cells to the column's declared
/// type so textual numbers in a numeric column sort as numbers.
pub fn compare_as(
    a: &CellValue,
    b: &CellValue,
    column_type: ColumnType,
    direction: SortDirection,
) -> Ordering {
    compare(&a.conform(column_type), &b.conform(column_type), direction)
}

fn compare_ascending(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    if let (CellValue::Integer(x), CellValue::Integer(y)) = (a, b) {
        return x.cmp(y);
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_instant(), b.as_instant()) {
        return x.cmp(&y);
    }

    collate(&a.display(), &b.display())
}

thread_local! {
    static ROOT_COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Case-sensitive, locale-aware string collation.
///
/// Uses the root-locale Unicode collator, so accented letters sort with
/// their base letter (`"école" < "zebra"`) and `"apple"` sorts before
/// `"Banana"`. Strings equal up to case order lower case first
/// (`"a" < "A"`), and anything still tied falls back to code-point order.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = ROOT_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase)),
    });
    if primary != Ordering::Equal {
        return primary;
    }

    let by_case = a
        .chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map(|(x, y)| case_rank(x).cmp(&case_rank(y)))
        .unwrap_or(Ordering::Equal);

    by_case.then_with(|| a.cmp(b))
}

fn case_rank(c: char) -> u8 {
    if c.is_lowercase() {
        0
    } else if c.is_uppercase() {
        1
    } else {
        2
    }
}

/// A free-text row filter, normalized once per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    needle: String,
}

impl FilterQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// True when any non-null cell's rendered text contains the query,
    /// ignoring case. An empty query matches every row.
    pub fn matches(&self, row: &Row) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        row.values().any(|value| self.matches_cell(value))
    }

    pub fn matches_cell(&self, value: &CellValue) -> bool {
        if value.is_null() {
            return false;
        }
        value.display().to_lowercase().contains(&self.needle)
    }
}

pub fn matches(row: &Row, query: &str) -> bool {
    FilterQuery::new(query).matches(row)
}
