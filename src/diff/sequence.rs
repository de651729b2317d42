//! Index-aligned comparison of two sequences

use serde::Serialize;

use super::filter::FieldFilter;
use super::mapping::FieldMapping;
use super::slot::Slot;

/// Classification of a positional difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Deleted,
    Changed,
}

/// One index-aligned comparison result: `(position, left, right)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionalDiff<T> {
    pub position: usize,
    pub left: Slot<T>,
    pub right: Slot<T>,
}

impl<T> PositionalDiff<T> {
    pub fn new(position: usize, left: Slot<T>, right: Slot<T>) -> Self {
        Self {
            position,
            left,
            right,
        }
    }

    pub fn kind(&self) -> DiffKind {
        match (&self.left, &self.right) {
            (Slot::Absent, _) => DiffKind::Added,
            (_, Slot::Absent) => DiffKind::Deleted,
            _ => DiffKind::Changed,
        }
    }
}

/// A value found at a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Positioned<T> {
    pub position: usize,
    pub value: T,
}

/// A value that differs between the two sides at a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueChange<T> {
    pub position: usize,
    pub old: T,
    pub new: T,
}

impl<T: Clone> ValueChange<&T> {
    pub fn cloned(&self) -> ValueChange<T> {
        ValueChange {
            position: self.position,
            old: self.old.clone(),
            new: self.new.clone(),
        }
    }
}

/// Positional diffs split by kind, each list ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition<T> {
    pub added: Vec<Positioned<T>>,
    pub deleted: Vec<Positioned<T>>,
    pub changed: Vec<ValueChange<T>>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            deleted: Vec::new(),
            changed: Vec::new(),
        }
    }
}

impl<T> Partition<T> {
    pub fn from_diffs<I>(diffs: I) -> Self
    where
        I: IntoIterator<Item = PositionalDiff<T>>,
    {
        let mut partition = Self::default();
        for diff in diffs {
            match (diff.left, diff.right) {
                (Slot::Absent, Slot::Present(value)) => partition.added.push(Positioned {
                    position: diff.position,
                    value,
                }),
                (Slot::Present(value), Slot::Absent) => partition.deleted.push(Positioned {
                    position: diff.position,
                    value,
                }),
                (Slot::Present(old), Slot::Present(new)) => partition.changed.push(ValueChange {
                    position: diff.position,
                    old,
                    new,
                }),
                (Slot::Absent, Slot::Absent) => {}
            }
        }
        partition
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.changed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.deleted.len() + self.changed.len()
    }
}

impl<T: Clone> Partition<&T> {
    pub fn cloned(&self) -> Partition<T> {
        let positioned = |p: &Positioned<&T>| Positioned {
            position: p.position,
            value: p.value.clone(),
        };
        Partition {
            added: self.added.iter().map(positioned).collect(),
            deleted: self.deleted.iter().map(positioned).collect(),
            changed: self.changed.iter().map(ValueChange::cloned).collect(),
        }
    }
}

/// Compares two finite sequences position by position.
///
/// A mapping changes which right-hand position is read for each left-hand
/// position; output stays ordered by the left-hand position. Filtered
/// positions are dropped before any lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceComparator<'c> {
    mapping: Option<&'c FieldMapping>,
    filter: Option<&'c FieldFilter>,
}

impl<'c> SequenceComparator<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, mapping: &'c FieldMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn with_filter(mut self, filter: &'c FieldFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    fn skips(&self, i: usize) -> bool {
        self.filter.is_some_and(|f| f.skips(i))
    }

    fn counterpart(&self, i: usize) -> usize {
        self.mapping.map_or(i, |m| m.resolve(i))
    }

    /// Compare with `==`
    pub fn compare<'s, T: PartialEq>(&self, a: &'s [T], b: &'s [T]) -> Vec<PositionalDiff<&'s T>> {
        self.compare_by(a, b, |x, y| x == y)
    }

    /// Compare with a caller supplied equality predicate
    pub fn compare_by<'s, T, F>(&self, a: &'s [T], b: &'s [T], eq: F) -> Vec<PositionalDiff<&'s T>>
    where
        F: Fn(&T, &T) -> bool,
    {
        let len = a.len().max(b.len());
        (0..len)
            .filter(|&i| !self.skips(i))
            .filter_map(|i| {
                let left = Slot::from(a.get(i));
                let right = Slot::from(b.get(self.counterpart(i)));
                if left.matches(right, &eq) {
                    None
                } else {
                    Some(PositionalDiff::new(i, left, right))
                }
            })
            .collect()
    }
}

/// Compare two sequences with no mapping and no filter
pub fn diff_by_index<'s, T: PartialEq>(a: &'s [T], b: &'s [T]) -> Vec<PositionalDiff<&'s T>> {
    SequenceComparator::new().compare(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(diffs: Vec<PositionalDiff<&i32>>) -> Vec<(usize, Option<i32>, Option<i32>)> {
        diffs
            .into_iter()
            .map(|d| {
                (
                    d.position,
                    d.left.cloned().into_option(),
                    d.right.cloned().into_option(),
                )
            })
            .collect()
    }

    fn mapped(a: &[i32], b: &[i32], pairs: &[(usize, usize)]) -> Vec<(usize, Option<i32>, Option<i32>)> {
        let mapping = FieldMapping::from_pairs(pairs.iter().copied()).unwrap();
        owned(SequenceComparator::new().with_mapping(&mapping).compare(a, b))
    }

    #[test]
    fn test_same() {
        assert!(diff_by_index(&[1, 2, 3], &[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_added() {
        assert_eq!(owned(diff_by_index(&[1, 2], &[1, 2, 3])), vec![(2, None, Some(3))]);
    }

    #[test]
    fn test_deleted() {
        assert_eq!(owned(diff_by_index(&[1, 2, 3], &[1, 2])), vec![(2, Some(3), None)]);
    }

    #[test]
    fn test_changed() {
        assert_eq!(owned(diff_by_index(&[1, 2, 3], &[1, 2, 4])), vec![(2, Some(3), Some(4))]);
    }

    #[test]
    fn test_added_changed() {
        assert_eq!(
            owned(diff_by_index(&[1, 2, 3], &[1, 2, 4, 5])),
            vec![(2, Some(3), Some(4)), (3, None, Some(5))]
        );
    }

    #[test]
    fn test_mapping_same() {
        assert!(mapped(&[1, 2, 3], &[1, 3, 2], &[(1, 2)]).is_empty());
    }

    #[test]
    fn test_mapping_added() {
        assert_eq!(
            mapped(&[1, 2], &[1, 2, 3], &[(1, 2)]),
            vec![(1, Some(2), Some(3)), (2, None, Some(2))]
        );
    }

    #[test]
    fn test_mapping_deleted() {
        assert_eq!(
            mapped(&[1, 2, 3], &[1, 2], &[(0, 1)]),
            vec![(0, Some(1), Some(2)), (1, Some(2), Some(1)), (2, Some(3), None)]
        );
    }

    #[test]
    fn test_empty_mapping_is_positional() {
        assert_eq!(
            mapped(&[1, 2, 3], &[1, 2, 4, 5], &[]),
            vec![(2, Some(3), Some(4)), (3, None, Some(5))]
        );
    }

    #[test]
    fn test_filter_removes_positions() {
        let filter = FieldFilter::skip([2]);
        let diffs = SequenceComparator::new()
            .with_filter(&filter)
            .compare(&[1, 2, 3], &[1, 2, 4, 5]);
        assert_eq!(owned(diffs), vec![(3, None, Some(5))]);

        let filter = FieldFilter::only([0, 1]);
        let diffs = SequenceComparator::new()
            .with_filter(&filter)
            .compare(&[1, 2, 3], &[1, 2, 4, 5]);
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_custom_equality() {
        let a = ["A".to_string(), "b".into()];
        let b = ["a".to_string(), "c".into()];
        let diffs = SequenceComparator::new().compare_by(&a, &b, |x, y| x.eq_ignore_ascii_case(y));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].position, 1);
        assert_eq!(diffs[0].kind(), DiffKind::Changed);
    }

    #[test]
    fn test_partition() {
        let diffs = diff_by_index(&[1, 2, 3], &[1, 9, 3, 4]);
        let partition = Partition::from_diffs(diffs).cloned();
        assert_eq!(partition.added, vec![Positioned { position: 3, value: 4 }]);
        assert!(partition.deleted.is_empty());
        assert_eq!(
            partition.changed,
            vec![ValueChange { position: 1, old: 2, new: 9 }]
        );
        assert_eq!(partition.len(), 2);
    }
}
