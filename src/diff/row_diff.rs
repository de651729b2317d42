//! Streaming row reconciliation

use std::iter::Fuse;

use log::debug;
use serde::Serialize;

use crate::error::{DiffError, Result};
use crate::model::{Row, RowSource};

use super::cell_diff::CellComparator;
use super::filter::FieldFilter;
use super::mapping::FieldMapping;
use super::sequence::{DiffKind, Partition, SequenceComparator, ValueChange};
use super::DiffStats;

/// A changed cell: position in the row plus old and new values
pub type CellChange = ValueChange<String>;

/// A difference between the rows found at one stream position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RowDiff {
    /// Only the second table has a row at this position
    Added { position: usize, row: Row },
    /// Only the first table has a row at this position
    Deleted { position: usize, row: Row },
    /// Both tables have a row here and at least one compared cell differs
    Changed {
        position: usize,
        old_row: Row,
        new_row: Row,
        changes: Vec<CellChange>,
    },
}

impl RowDiff {
    /// Get the stream position of this change
    pub fn position(&self) -> usize {
        match self {
            RowDiff::Added { position, .. }
            | RowDiff::Deleted { position, .. }
            | RowDiff::Changed { position, .. } => *position,
        }
    }

    pub fn kind(&self) -> DiffKind {
        match self {
            RowDiff::Added { .. } => DiffKind::Added,
            RowDiff::Deleted { .. } => DiffKind::Deleted,
            RowDiff::Changed { .. } => DiffKind::Changed,
        }
    }
}

/// Walks two row streams in lock-step and yields a [`RowDiff`] for every
/// position whose rows differ.
///
/// Single pass: the underlying streams are consumed as the iterator advances.
/// The first error ends the iteration.
pub struct RowDiffs<'e> {
    rows_a: Fuse<RowSource>,
    rows_b: Fuse<RowSource>,
    cells: &'e CellComparator,
    mapping: Option<&'e FieldMapping>,
    filter: &'e FieldFilter,
    difference_detected: &'e mut bool,
    position: usize,
    finished: bool,
    stats: DiffStats,
}

impl<'e> RowDiffs<'e> {
    pub(crate) fn new(
        rows_a: RowSource,
        rows_b: RowSource,
        cells: &'e CellComparator,
        mapping: Option<&'e FieldMapping>,
        filter: &'e FieldFilter,
        difference_detected: &'e mut bool,
    ) -> Self {
        Self {
            rows_a: rows_a.fuse(),
            rows_b: rows_b.fuse(),
            cells,
            mapping,
            filter,
            difference_detected,
            position: 0,
            finished: false,
            stats: DiffStats::default(),
        }
    }

    /// Counts gathered so far
    pub fn stats(&self) -> &DiffStats {
        &self.stats
    }

    /// Advance both streams by one row. `Ok(None)` means nothing to report at
    /// this position, or the end of both streams.
    fn step(&mut self) -> Result<Option<RowDiff>> {
        let left = self.rows_a.next().transpose()?;
        let right = self.rows_b.next().transpose()?;
        let position = self.position;
        self.position += 1;

        if left.is_some() {
            self.stats.old_row_count += 1;
        }
        if right.is_some() {
            self.stats.new_row_count += 1;
        }

        let diff = match (left, right) {
            (None, None) => {
                debug!("Row streams exhausted after {} positions", position);
                self.finished = true;
                return Ok(None);
            }
            (None, Some(row)) => {
                self.stats.rows_added += 1;
                RowDiff::Added { position, row }
            }
            (Some(row), None) => {
                self.stats.rows_deleted += 1;
                RowDiff::Deleted { position, row }
            }
            (Some(old_row), Some(new_row)) => {
                match self.compare_rows(position, &old_row, &new_row)? {
                    Some(changes) => {
                        self.stats.rows_changed += 1;
                        self.stats.cells_changed += changes.len();
                        RowDiff::Changed {
                            position,
                            old_row,
                            new_row,
                            changes,
                        }
                    }
                    None => {
                        self.stats.rows_unchanged += 1;
                        return Ok(None);
                    }
                }
            }
        };

        *self.difference_detected = true;
        Ok(Some(diff))
    }

    /// Changed cells between two paired rows, `None` when every compared cell
    /// matches
    fn compare_rows(
        &self,
        position: usize,
        old_row: &Row,
        new_row: &Row,
    ) -> Result<Option<Vec<CellChange>>> {
        if old_row.len() != new_row.len() {
            return Err(DiffError::ArityMismatch {
                position,
                left: old_row.len(),
                right: new_row.len(),
            });
        }

        let mut sequence = SequenceComparator::new().with_filter(self.filter);
        if let Some(mapping) = self.mapping {
            sequence = sequence.with_mapping(mapping);
        }
        let cells = self.cells;
        let diffs = sequence.compare_by(old_row, new_row, |a, b| cells.equal(a, b));
        let changes: Vec<CellChange> = Partition::from_diffs(diffs)
            .changed
            .iter()
            .map(ValueChange::cloned)
            .collect();

        Ok((!changes.is_empty()).then_some(changes))
    }
}

impl Iterator for RowDiffs<'_> {
    type Item = Result<RowDiff>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.step() {
                Ok(Some(diff)) => return Some(Ok(diff)),
                Ok(None) => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
