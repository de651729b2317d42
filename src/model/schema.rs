//! Field names and where they came from

use serde::{Deserialize, Serialize};

/// How a schema was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SchemaOrigin {
    /// Supplied by the caller
    Explicit,
    /// Read from the first row of the source
    Labels,
    /// Generated as stringified 0-based column indices
    #[default]
    Synthesized,
}

impl std::fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaOrigin::Explicit => write!(f, "explicit"),
            SchemaOrigin::Labels => write!(f, "labels"),
            SchemaOrigin::Synthesized => write!(f, "synthesized"),
        }
    }
}

/// Ordered field names describing a table's columns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<String>,
    origin: SchemaOrigin,
    label_first_row: bool,
}

impl Schema {
    /// Create a schema from caller-supplied names
    pub fn explicit(fields: Vec<String>, label_first_row: bool) -> Self {
        Self {
            fields,
            origin: SchemaOrigin::Explicit,
            label_first_row,
        }
    }

    /// Create a schema from a label row
    pub fn from_labels(fields: Vec<String>) -> Self {
        Self {
            fields,
            origin: SchemaOrigin::Labels,
            label_first_row: true,
        }
    }

    /// Create a schema named "0", "1", ... for `width` columns
    pub fn synthesized(width: usize) -> Self {
        Self {
            fields: (0..width).map(|i| i.to_string()).collect(),
            origin: SchemaOrigin::Synthesized,
            label_first_row: false,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn origin(&self) -> SchemaOrigin {
        self.origin
    }

    /// Whether field names carry meaning that can be matched across tables.
    ///
    /// Explicit schemas on tables flagged as label-first count as labelled.
    pub fn is_labelled(&self) -> bool {
        self.label_first_row
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// All positions holding `name`
    pub fn positions(&self, name: &str) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.as_str() == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Name used when reporting a position, falling back to the index
    pub fn display_name(&self, index: usize) -> String {
        self.get(index)
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_names() {
        let schema = Schema::synthesized(3);
        assert_eq!(schema.fields(), &["0", "1", "2"]);
        assert_eq!(schema.origin(), SchemaOrigin::Synthesized);
        assert!(!schema.is_labelled());
    }

    #[test]
    fn test_positions_and_display_name() {
        let schema = Schema::from_labels(vec!["id".into(), "name".into(), "id".into()]);
        assert_eq!(schema.positions("id"), vec![0, 2]);
        assert!(schema.positions("missing").is_empty());
        assert_eq!(schema.display_name(1), "name");
        assert_eq!(schema.display_name(7), "7");
    }
}
