use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Turns an ascending comparison into one for this direction.
    pub fn apply(self, ascending: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    }
}

/// Active sort key and direction. `column == None` keeps delivery order.
///
/// The key is generic so the file list can reuse the same click-to-toggle
/// behaviour with its own field enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec<K = String> {
    pub column: Option<K>,
    pub direction: SortDirection,
}

impl<K> Default for SortSpec<K> {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::Asc,
        }
    }
}

impl<K: PartialEq> SortSpec<K> {
    pub fn by(column: K, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    pub fn is_sorted_by(&self, column: &K) -> bool {
        self.column.as_ref() == Some(column)
    }

    /// Clicking the active column flips the direction; any other column
    /// becomes active in ascending order. There is no way back to unsorted.
    pub fn toggle(&mut self, column: K) {
        if self.is_sorted_by(&column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }
}

impl SortSpec<String> {
    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_same_column_and_resets_on_new_column() {
        let mut spec = SortSpec::<String>::default();

        spec.toggle("a".to_string());
        assert_eq!(spec, SortSpec::by("a".to_string(), SortDirection::Asc));
        spec.toggle("a".to_string());
        assert_eq!(spec.direction, SortDirection::Desc);
        spec.toggle("a".to_string());
        assert_eq!(spec.direction, SortDirection::Asc);

        spec.toggle("a".to_string());
        spec.toggle("b".to_string());
        assert_eq!(spec, SortSpec::by("b".to_string(), SortDirection::Asc));
    }
}
