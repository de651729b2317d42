//! Column pairing between two schemas

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::error::{DiffError, Result};

/// Symmetric pairing of column positions across two tables.
///
/// Every linked pair `(a, b)` is also readable as `(b, a)`. Looking up a
/// position prefers the pair it was linked from over a reflected one, so a
/// label permutation such as `(x, y, z)` vs `(z, x, y)` resolves each
/// position of the first table to its own counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    links: IndexMap<usize, usize>,
    reflected: FxHashMap<usize, usize>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from hand-picked pairs.
    ///
    /// Fails when two pairs would route one position to two counterparts or
    /// two positions to the same counterpart.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut mapping = Self::new();
        for (a, b) in pairs {
            mapping.insert(a, b)?;
        }
        Ok(mapping)
    }

    /// Pair each label of `left` with the first equal, not yet paired label
    /// of `right`. Labels without a counterpart stay unmapped.
    pub fn from_labels<S: AsRef<str>>(left: &[S], right: &[S]) -> Self {
        let mut mapping = Self::new();
        for (i, label) in left.iter().enumerate() {
            let found = right.iter().enumerate().position(|(j, candidate)| {
                candidate.as_ref() == label.as_ref() && !mapping.reflected.contains_key(&j)
            });
            if let Some(j) = found {
                mapping.link(i, j);
            }
        }
        mapping
    }

    /// Add the pair `(a, b)` and its reflection
    pub fn insert(&mut self, a: usize, b: usize) -> Result<()> {
        if let Some(&existing) = self.links.get(&a) {
            if existing == b {
                return Ok(());
            }
            return Err(DiffError::ConflictingMapping {
                position: a,
                existing,
                requested: b,
            });
        }
        if let Some(&owner) = self.reflected.get(&b) {
            return Err(DiffError::ConflictingMapping {
                position: b,
                existing: owner,
                requested: a,
            });
        }
        self.link(a, b);
        Ok(())
    }

    fn link(&mut self, a: usize, b: usize) {
        self.links.insert(a, b);
        self.reflected.insert(b, a);
    }

    /// Counterpart of position `i`, if any
    pub fn get(&self, i: usize) -> Option<usize> {
        self.links
            .get(&i)
            .or_else(|| self.reflected.get(&i))
            .copied()
    }

    /// Counterpart of position `i`, or `i` itself when unmapped
    pub fn resolve(&self, i: usize) -> usize {
        self.get(i).unwrap_or(i)
    }

    /// Whether `i` and `j` are paired, in either direction
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.links.get(&i) == Some(&j) || self.links.get(&j) == Some(&i)
    }

    /// Linked pairs in insertion order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.links.iter().map(|(&a, &b)| (a, b))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// True when every linked pair maps a position onto itself
    pub fn is_identity(&self) -> bool {
        self.links.iter().all(|(a, b)| a == b)
    }
}
