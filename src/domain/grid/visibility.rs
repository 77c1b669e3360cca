use std::collections::BTreeSet;

/// Set of column names the grid renders.
///
/// Initialization is tracked per column name rather than inferred from an
/// empty set: a column is shown automatically the first time it appears in a
/// page schema and never again, so hiding every column sticks across page
/// replacements. Names of columns missing from the current page stay in the
/// set but render nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleColumns {
    visible: BTreeSet<String>,
    seeded: BTreeSet<String>,
}

impl VisibleColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows every column in `names` that has never been seeded before.
    pub fn seed<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            if self.seeded.insert(name.to_string()) {
                self.visible.insert(name.to_string());
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.seeded.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.visible.contains(name)
    }

    /// Flips membership of `name` and returns whether it is now visible.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.visible.remove(name) {
            false
        } else {
            self.visible.insert(name.to_string());
            true
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
