//! Diff engine for comparing tables

pub mod cell_diff;
mod filter;
mod mapping;
mod row_diff;
mod schema_diff;
mod sequence;
mod slot;

use log::{debug, warn};
use serde::Serialize;

use crate::error::{DiffError, Result};
use crate::model::{Row, Schema, Table};

pub use cell_diff::CellComparator;
pub use filter::FieldFilter;
pub use mapping::FieldMapping;
pub use row_diff::{CellChange, RowDiff, RowDiffs};
pub use schema_diff::{SchemaChange, SchemaComparator, SchemaDiff};
pub use sequence::{
    diff_by_index, DiffKind, Partition, Positioned, PositionalDiff, SequenceComparator,
    ValueChange,
};
pub use slot::Slot;

/// Statistics about the diff
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub rows_added: usize,
    pub rows_deleted: usize,
    pub rows_changed: usize,
    pub rows_unchanged: usize,
    pub cells_changed: usize,
    pub old_row_count: usize,
    pub new_row_count: usize,
}

impl DiffStats {
    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.rows_added > 0 || self.rows_deleted > 0 || self.rows_changed > 0
    }
}

/// Options consumed by the engine
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Columns excluded from comparison
    pub filter: FieldFilter,
    /// Case-insensitive string comparison
    pub ignore_case: bool,
    /// Pair columns by label instead of by position
    pub ignore_order: bool,
    /// Report detail level, not used by the comparison itself
    pub verbosity: u8,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            filter: FieldFilter::None,
            ignore_case: false,
            ignore_order: false,
            verbosity: 2,
        }
    }
}

impl DiffOptions {
    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = ignore;
        self
    }

    pub fn with_ignore_order(mut self, ignore: bool) -> Self {
        self.ignore_order = ignore;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Result of comparing two tables
#[derive(Debug, Default, Serialize)]
pub struct DiffResult {
    /// Field-level differences
    pub schema: SchemaDiff,
    /// Row differences (added, deleted, changed), ordered by position
    pub row_changes: Vec<RowDiff>,
    /// Whether row comparison was skipped because the schemas differ
    pub rows_skipped: bool,
    /// Statistics
    pub stats: DiffStats,
}

impl DiffResult {
    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        !self.schema.is_empty() || !self.row_changes.is_empty()
    }

    /// Get only added rows
    pub fn added_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.row_changes.iter().filter_map(|c| match c {
            RowDiff::Added { position, row } => Some((*position, row)),
            _ => None,
        })
    }

    /// Get only deleted rows
    pub fn deleted_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.row_changes.iter().filter_map(|c| match c {
            RowDiff::Deleted { position, row } => Some((*position, row)),
            _ => None,
        })
    }

    /// Get only changed rows
    pub fn changed_rows(&self) -> impl Iterator<Item = (usize, &Row, &Row, &Vec<CellChange>)> {
        self.row_changes.iter().filter_map(|c| match c {
            RowDiff::Changed {
                position,
                old_row,
                new_row,
                changes,
            } => Some((*position, old_row, new_row, changes)),
            _ => None,
        })
    }
}

/// Main diff engine.
///
/// Owns both tables. [`DiffEngine::diff_schema`] compares field names;
/// [`DiffEngine::diff_rows`] streams row differences and should only be used
/// once the schemas compare equal. The difference flag is cumulative.
pub struct DiffEngine {
    table_a: Table,
    table_b: Table,
    options: DiffOptions,
    cells: CellComparator,
    mapping: Option<FieldMapping>,
    mapping_active: bool,
    difference_detected: bool,
}

impl DiffEngine {
    /// Create a new diff engine.
    ///
    /// Fails when ignore-order is requested and either table lacks a
    /// label-derived schema.
    pub fn new(table_a: Table, table_b: Table, options: DiffOptions) -> Result<Self> {
        let labelled = table_a.is_labelled() && table_b.is_labelled();
        if options.ignore_order && !labelled {
            return Err(DiffError::config(
                "ignore-order only makes sense for labeled tables",
            ));
        }
        if table_a.is_labelled() != table_b.is_labelled() {
            warn!("Only one table uses labels; columns will be compared by position");
        }

        let mapping = labelled.then(|| FieldMapping::from_labels(table_a.fields(), table_b.fields()));
        if let Some(ref mapping) = mapping {
            debug!(
                "Built field mapping with {} pairs: {:?}",
                mapping.len(),
                mapping.pairs().collect::<Vec<_>>()
            );
        }

        let cells = CellComparator::new(options.ignore_case);
        let mapping_active = options.ignore_order;
        Ok(Self {
            table_a,
            table_b,
            options,
            cells,
            mapping,
            mapping_active,
            difference_detected: false,
        })
    }

    /// Replace the label-derived mapping with a hand-built one and use it
    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = Some(mapping);
        self.mapping_active = true;
        self
    }

    pub fn schema_a(&self) -> &Schema {
        self.table_a.schema()
    }

    pub fn schema_b(&self) -> &Schema {
        self.table_b.schema()
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// The mapping built for labelled tables, whether or not it is in use
    pub fn mapping(&self) -> Option<&FieldMapping> {
        self.mapping.as_ref()
    }

    /// True once any schema or row difference has been reported
    pub fn difference_detected(&self) -> bool {
        self.difference_detected
    }

    fn sequence(&self) -> SequenceComparator<'_> {
        let mut sequence = SequenceComparator::new().with_filter(&self.options.filter);
        if let (true, Some(mapping)) = (self.mapping_active, self.mapping.as_ref()) {
            sequence = sequence.with_mapping(mapping);
        }
        sequence
    }

    /// Compare the two schemas
    pub fn diff_schema(&mut self) -> SchemaDiff {
        let diff = SchemaComparator::compare(
            self.table_a.schema(),
            self.table_b.schema(),
            &self.sequence(),
            &self.cells,
        );
        debug!(
            "Schema diff: {} added, {} deleted, {} changed",
            diff.added.len(),
            diff.deleted.len(),
            diff.changed.len()
        );
        if !diff.is_empty() {
            self.difference_detected = true;
        }
        diff
    }

    /// Stream row differences. The row sources can be taken only once.
    pub fn diff_rows(&mut self) -> Result<RowDiffs<'_>> {
        let (rows_a, rows_b) = match (self.table_a.take_rows(), self.table_b.take_rows()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(DiffError::RowsConsumed),
        };
        let mapping = if self.mapping_active {
            self.mapping.as_ref()
        } else {
            None
        };
        Ok(RowDiffs::new(
            rows_a,
            rows_b,
            &self.cells,
            mapping,
            &self.options.filter,
            &mut self.difference_detected,
        ))
    }

    /// Run the full comparison: schemas first, rows only if the schemas match
    pub fn diff(&mut self) -> Result<DiffResult> {
        let schema = self.diff_schema();
        if !schema.is_empty() {
            debug!("Fields changed, skipping row diff");
            return Ok(DiffResult {
                schema,
                rows_skipped: true,
                ..Default::default()
            });
        }

        let mut rows = self.diff_rows()?;
        let row_changes = rows.by_ref().collect::<Result<Vec<_>>>()?;
        let stats = rows.stats().clone();
        Ok(DiffResult {
            schema,
            row_changes,
            rows_skipped: false,
            stats,
        })
    }
}

/// Convenience function to compute diff
pub fn compute_diff(table_a: Table, table_b: Table, options: DiffOptions) -> Result<DiffResult> {
    DiffEngine::new(table_a, table_b, options)?.diff()
}
