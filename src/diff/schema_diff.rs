//! Schema comparison logic

use serde::Serialize;

use crate::model::Schema;

use super::cell_diff::CellComparator;
use super::sequence::{Partition, SequenceComparator};

/// Field-level differences: added, deleted and changed field names
pub type SchemaDiff = Partition<String>;

/// Types of schema changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaChange {
    /// Field exists only in the second table
    FieldAdded { name: String, index: usize },
    /// Field exists only in the first table
    FieldDeleted { name: String, index: usize },
    /// Field name differs at the same position
    FieldChanged {
        old_name: String,
        new_name: String,
        index: usize,
    },
}

impl std::fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaChange::FieldAdded { name, index } => {
                write!(f, "Field '{}' added at position {}", name, index)
            }
            SchemaChange::FieldDeleted { name, index } => {
                write!(f, "Field '{}' deleted from position {}", name, index)
            }
            SchemaChange::FieldChanged {
                old_name, new_name, ..
            } => {
                write!(f, "Field changed: '{}' -> '{}'", old_name, new_name)
            }
        }
    }
}

impl SchemaDiff {
    /// Flatten into a list of changes: added, then deleted, then changed
    pub fn changes(&self) -> Vec<SchemaChange> {
        let added = self.added.iter().map(|p| SchemaChange::FieldAdded {
            name: p.value.clone(),
            index: p.position,
        });
        let deleted = self.deleted.iter().map(|p| SchemaChange::FieldDeleted {
            name: p.value.clone(),
            index: p.position,
        });
        let changed = self.changed.iter().map(|c| SchemaChange::FieldChanged {
            old_name: c.old.clone(),
            new_name: c.new.clone(),
            index: c.position,
        });
        added.chain(deleted).chain(changed).collect()
    }
}

/// Schema comparison engine
pub struct SchemaComparator;

impl SchemaComparator {
    /// Compare the field names of two schemas
    pub fn compare(
        old_schema: &Schema,
        new_schema: &Schema,
        sequence: &SequenceComparator<'_>,
        cells: &CellComparator,
    ) -> SchemaDiff {
        let diffs = sequence.compare_by(old_schema.fields(), new_schema.fields(), |a, b| {
            cells.equal(a, b)
        });
        Partition::from_diffs(diffs).cloned()
    }
}
