use crate::models::Interest;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Flattened interests keyed by list id.
///
/// Entries are written once and then only read. Writing the same list id again
/// replaces the entry wholesale; with identical upstream data that is a no-op.
#[derive(Debug, Default)]
pub struct InterestCache {
    entries: DashMap<String, Arc<Vec<Interest>>>,
}

/// Size summary of an [`InterestCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestCacheStats {
    pub list_count: usize,
    pub interest_count: usize,
}

impl InterestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, list_id: &str) -> Option<Arc<Vec<Interest>>> {
        self.entries
            .get(list_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Store the interests for a list, keeping only the first occurrence of each interest id.
    pub fn put(&self, list_id: impl Into<String>, interests: Vec<Interest>) -> Arc<Vec<Interest>> {
        let mut seen = HashSet::with_capacity(interests.len());
        let unique: Vec<Interest> = interests
            .into_iter()
            .filter(|interest| seen.insert(interest.id.clone()))
            .collect();

        let entry = Arc::new(unique);
        self.entries.insert(list_id.into(), Arc::clone(&entry));
        entry
    }

    pub fn contains(&self, list_id: &str) -> bool {
        self.entries.contains_key(list_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> InterestCacheStats {
        InterestCacheStats {
            list_count: self.entries.len(),
            interest_count: self.entries.iter().map(|entry| entry.value().len()).sum(),
        }
    }
}
