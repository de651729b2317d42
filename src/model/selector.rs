//! Field references used by skip/only lists

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;

use crate::error::{DiffError, Result};

use super::schema::Schema;

/// A reference to a column, either by number (`@3`) or by label (`name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    Index(usize),
    Label(String),
}

impl FieldSelector {
    /// Parse a comma separated list such as `@0, name, @4`.
    /// Blank entries are ignored.
    pub fn parse_list(list: &str) -> Result<Vec<FieldSelector>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }

    /// Resolve to a column position valid for both schemas
    pub fn resolve(&self, schema_a: &Schema, schema_b: &Schema) -> Result<usize> {
        match self {
            FieldSelector::Index(i) => Ok(*i),
            FieldSelector::Label(name) => {
                let left = resolve_label(name, schema_a, 1)?;
                let right = resolve_label(name, schema_b, 2)?;
                if left != right {
                    return Err(DiffError::FieldPositionMismatch {
                        name: name.clone(),
                        left,
                        right,
                    });
                }
                Ok(left)
            }
        }
    }

    /// Resolve a whole list into a set of positions
    pub fn resolve_all(
        selectors: &[FieldSelector],
        schema_a: &Schema,
        schema_b: &Schema,
    ) -> Result<FxHashSet<usize>> {
        selectors
            .iter()
            .map(|s| s.resolve(schema_a, schema_b))
            .collect()
    }
}

fn resolve_label(name: &str, schema: &Schema, table: usize) -> Result<usize> {
    match schema.positions(name).as_slice() {
        [single] => Ok(*single),
        [] => Err(DiffError::FieldNotFound {
            name: name.to_string(),
            table,
        }),
        _ => Err(DiffError::AmbiguousField {
            name: name.to_string(),
            table,
        }),
    }
}

impl FromStr for FieldSelector {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.strip_prefix('@') {
            Some(number) => number
                .trim_start_matches('@')
                .parse::<usize>()
                .map(FieldSelector::Index)
                .map_err(|_| DiffError::InvalidFieldNumber(number.to_string())),
            None => Ok(FieldSelector::Label(s.to_string())),
        }
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSelector::Index(i) => write!(f, "@{}", i),
            FieldSelector::Label(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Schema {
        Schema::from_labels(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_parse_list() {
        let parsed = FieldSelector::parse_list(" @0, name ,,@12").unwrap();
        assert_eq!(
            parsed,
            vec![
                FieldSelector::Index(0),
                FieldSelector::Label("name".into()),
                FieldSelector::Index(12),
            ]
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = FieldSelector::parse_list("@x").unwrap_err();
        assert!(matches!(err, DiffError::InvalidFieldNumber(ref s) if s == "x"));
    }

    #[test]
    fn test_resolve_label() {
        let a = labels(&["id", "name", "age"]);
        let b = labels(&["id", "name", "city"]);
        assert_eq!(FieldSelector::Label("name".into()).resolve(&a, &b).unwrap(), 1);
        assert_eq!(FieldSelector::Index(9).resolve(&a, &b).unwrap(), 9);
    }

    #[test]
    fn test_resolve_label_errors() {
        let a = labels(&["id", "id", "age"]);
        let b = labels(&["id", "age"]);
        let err = FieldSelector::Label("id".into()).resolve(&a, &b).unwrap_err();
        assert!(matches!(err, DiffError::AmbiguousField { table: 1, .. }));

        let err = FieldSelector::Label("zip".into()).resolve(&b, &b).unwrap_err();
        assert!(matches!(err, DiffError::FieldNotFound { table: 1, .. }));

        let c = labels(&["age", "id"]);
        let err = FieldSelector::Label("age".into()).resolve(&b, &c).unwrap_err();
        assert!(matches!(
            err,
            DiffError::FieldPositionMismatch { left: 1, right: 0, .. }
        ));
    }
}
