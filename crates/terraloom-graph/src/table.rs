//! Insert-only lookup tables keyed by logical name

use crate::error::{GraphError, Result};
use std::collections::BTreeMap;

/// Monotonically growing map from logical name to a value
///
/// Entries are never replaced or removed; inserting an existing key fails.
#[derive(Debug, Clone)]
pub struct LookupTable<V> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for LookupTable<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> LookupTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<&V> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(GraphError::DuplicateDeclaration(key));
        }
        Ok(self.entries.entry(key).or_insert(value))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter()
    }
}
