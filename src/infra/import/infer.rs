//! Column typing for imported tables.
//!
//! A column takes the narrowest type every non-empty cell parses as, trying
//! boolean, integer, double, date and timestamp in that order. Columns with
//! no values, or with any value none of those accept, are strings.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::RawTable;
use crate::domain::entities::{CellValue, Column, ColumnStatistics, ColumnType, SortDirection};
use crate::domain::grid::compare;
use crate::usecase::ports::source::TabularData;

const CANDIDATES: [ColumnType; 5] = [
    ColumnType::Boolean,
    ColumnType::Integer,
    ColumnType::Double,
    ColumnType::Date,
    ColumnType::Timestamp,
];

fn accepts(column_type: ColumnType, text: &str) -> bool {
    match (column_type, CellValue::parse_as(text, column_type)) {
        (ColumnType::Boolean, CellValue::Bool(_)) => true,
        (ColumnType::Integer, CellValue::Integer(_)) => true,
        (ColumnType::Double, CellValue::Double(v)) => v.is_finite(),
        (ColumnType::Double, CellValue::Integer(_)) => true,
        (ColumnType::Date, CellValue::Date(_)) => true,
        (ColumnType::Timestamp, CellValue::Timestamp(_) | CellValue::Date(_)) => true,
        _ => false,
    }
}

pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a str> + Clone) -> ColumnType {
    if values.clone().into_iter().next().is_none() {
        return ColumnType::String;
    }
    CANDIDATES
        .into_iter()
        .find(|candidate| values.clone().into_iter().all(|text| accepts(*candidate, text)))
        .unwrap_or(ColumnType::String)
}

fn column_statistics(
    values: &[&str],
    null_count: usize,
    column_type: ColumnType,
) -> ColumnStatistics {
    let distinct: HashSet<&str> = values.iter().copied().collect();

    let mut min: Option<CellValue> = None;
    let mut max: Option<CellValue> = None;
    for text in values {
        let value = CellValue::parse_as(text, column_type);
        let lower = match &min {
            Some(current) => compare(&value, current, SortDirection::Asc) == Ordering::Less,
            None => true,
        };
        let higher = match &max {
            Some(current) => compare(&value, current, SortDirection::Asc) == Ordering::Greater,
            None => true,
        };
        if lower {
            min = Some(value.clone());
        }
        if higher {
            max = Some(value);
        }
    }

    ColumnStatistics {
        min,
        max,
        null_count: Some(null_count as u64),
        distinct_count: Some(distinct.len() as u64),
    }
}

/// Types every column of `table` and attaches its statistics.
pub fn infer_table(table: RawTable) -> TabularData {
    let columns = table
        .headers
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let cells = table.rows.iter().map(|row| row.get(col_idx).and_then(Option::as_deref));
            let values: Vec<&str> = cells.clone().flatten().collect();
            let null_count = cells.filter(Option::is_none).count();

            let column_type = infer_column_type(values.iter().copied());
            Column::new(name.clone(), column_type)
                .nullable(null_count > 0)
                .with_statistics(column_statistics(&values, null_count, column_type))
        })
        .collect();

    TabularData {
        columns,
        rows: table.rows,
    }
}
