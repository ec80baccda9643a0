//! Per-invocation argument containers.

use std::collections::BTreeMap;

use super::{ArgumentValue, FromArgument, RawValue};

/// Ordered `(name, raw value)` pairs collected from either wire protocol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentBag {
    entries: Vec<(String, RawValue)>,
}

impl ArgumentBag {
    /// Creates an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a pair. The name is lowercased.
    pub fn push(&mut self, name: impl Into<String>, value: RawValue) {
        self.entries.push((name.into().to_ascii_lowercase(), value));
    }

    /// Appends a pair and returns the bag.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the first raw value recorded under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }

    /// Iterates over the pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no pair was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, RawValue)> for ArgumentBag {
    fn from_iter<T: IntoIterator<Item = (N, RawValue)>>(iter: T) -> Self {
        let mut bag = Self::new();
        for (name, value) in iter {
            bag.push(name, value);
        }
        bag
    }
}

/// Converted arguments handed to a handler.
///
/// Absent options (never supplied, sentinel tokens, or lookups that found
/// nothing) are indistinguishable; handlers pick a fallback with
/// [`Arguments::value_or`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: BTreeMap<String, ArgumentValue>,
}

impl Arguments {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Records a converted value.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) {
        self.values.insert(name.into(), value);
    }

    /// Records a converted value and returns the set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: ArgumentValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the typed value for `name`, or `None` when it is absent or of a
    /// different type.
    #[must_use]
    pub fn get<T: FromArgument>(&self, name: &str) -> Option<T> {
        self.values.get(name).and_then(T::from_argument)
    }

    /// Returns the typed value for `name`, or `default`.
    #[must_use]
    pub fn value_or<T: FromArgument>(&self, name: &str, default: T) -> T {
        self.get(name).unwrap_or(default)
    }

    /// Returns the typed value for `name`, or the result of `default`.
    #[must_use]
    pub fn value_or_else<T: FromArgument>(&self, name: &str, default: impl FnOnce() -> T) -> T {
        self.get(name).unwrap_or_else(default)
    }

    /// Returns the untyped value for `name`.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    /// Returns `true` when a value is present for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of present values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no value is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
