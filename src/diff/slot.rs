//! Value-or-absent marker for positional comparison

use std::fmt;

use serde::Serialize;

/// A value read at a position, or the marker for "this sequence has no such
/// position". `Absent` is distinct from every real value, the empty string
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Slot<T> {
    Present(T),
    Absent,
}

impl<T> Slot<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Slot::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn as_ref(&self) -> Slot<&T> {
        match self {
            Slot::Present(v) => Slot::Present(v),
            Slot::Absent => Slot::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Slot::Present(v) => Some(v),
            Slot::Absent => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Slot<U> {
        match self {
            Slot::Present(v) => Slot::Present(f(v)),
            Slot::Absent => Slot::Absent,
        }
    }
}

impl<'a, T> Slot<&'a T> {
    /// Compare two slots with `eq`. Absent never equals a present value.
    pub fn matches<F>(self, other: Slot<&'a T>, eq: &F) -> bool
    where
        F: Fn(&T, &T) -> bool,
    {
        match (self, other) {
            (Slot::Present(x), Slot::Present(y)) => eq(x, y),
            (Slot::Absent, Slot::Absent) => true,
            _ => false,
        }
    }

    pub fn cloned(self) -> Slot<T>
    where
        T: Clone,
    {
        self.map(Clone::clone)
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Slot::Present(v),
            None => Slot::Absent,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Present(v) => v.fmt(f),
            Slot::Absent => write!(f, "nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_differs_from_empty() {
        let empty = String::new();
        let eq = |a: &String, b: &String| a == b;
        assert!(!Slot::Present(&empty).matches(Slot::Absent, &eq));
        assert!(!Slot::Absent.matches(Slot::Present(&empty), &eq));
        assert!(Slot::<&String>::Absent.matches(Slot::Absent, &eq));
    }

    #[test]
    fn test_from_option() {
        let values = [1, 2];
        assert_eq!(Slot::from(values.get(1)), Slot::Present(&2));
        assert_eq!(Slot::from(values.get(5)), Slot::Absent);
        assert_eq!(Slot::from(values.get(0)).cloned().into_option(), Some(1));
    }
}
