//! Column exclusion

use rustc_hash::FxHashSet;

/// Which column positions take part in a comparison
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldFilter {
    /// Compare every position
    #[default]
    None,
    /// Leave these positions out
    Skip(FxHashSet<usize>),
    /// Compare only these positions
    Only(FxHashSet<usize>),
}

impl FieldFilter {
    pub fn skip<I: IntoIterator<Item = usize>>(positions: I) -> Self {
        FieldFilter::Skip(positions.into_iter().collect())
    }

    pub fn only<I: IntoIterator<Item = usize>>(positions: I) -> Self {
        FieldFilter::Only(positions.into_iter().collect())
    }

    /// True when position `i` must be left out of the comparison
    pub fn skips(&self, i: usize) -> bool {
        match self {
            FieldFilter::None => false,
            FieldFilter::Skip(set) => set.contains(&i),
            FieldFilter::Only(set) => !set.contains(&i),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, FieldFilter::None)
    }

    /// Positions below `width` that are excluded, in ascending order
    pub fn skipped_positions(&self, width: usize) -> Vec<usize> {
        (0..width).filter(|&i| self.skips(i)).collect()
    }
}
