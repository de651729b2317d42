//! Cell-level comparison logic

/// Cell comparator with configurable options
#[derive(Debug, Clone, Copy, Default)]
pub struct CellComparator {
    ignore_case: bool,
}

impl CellComparator {
    /// Create a new cell comparator
    pub fn new(ignore_case: bool) -> Self {
        Self { ignore_case }
    }

    pub fn ignores_case(&self) -> bool {
        self.ignore_case
    }

    /// Compare two cell values for equality
    pub fn equal(&self, a: &str, b: &str) -> bool {
        if self.ignore_case {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        } else {
            a == b
        }
    }
}
