//! Ordered entity collections.
//!
//! A [`Collection`] is a flat, ordered sequence of shared records. Primary
//! keys are unique by construction: every way of adding records goes through
//! [`Collection::upsert`], which replaces a record with the same id instead
//! of appending a second one.

use crate::{Entity, Group, ScopeResult, Store, ValidationError, Website};
use std::collections::HashMap;
use std::sync::Arc;

pub type WebsiteCollection = Collection<Website>;
pub type GroupCollection = Collection<Group>;
pub type StoreCollection = Collection<Store>;

/// Ordered sequence of records sharing one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T: Entity> {
    items: Vec<Arc<T>>,
}

impl<T: Entity> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<T>> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<T>> {
        self.items.get(index)
    }

    /// Linear scan for a primary key.
    pub fn by_id(&self, id: u32) -> Option<&Arc<T>> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// Linear scan for a code. Always `None` for kinds without codes.
    pub fn by_code(&self, code: &str) -> Option<&Arc<T>> {
        self.items.iter().find(|e| e.code() == Some(code))
    }

    pub fn ids(&self) -> Vec<u32> {
        self.items.iter().map(|e| e.id()).collect()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.items.iter().filter_map(|e| e.code()).collect()
    }

    /// New collection holding the records that satisfy `predicate`, in the
    /// same order. Records are shared, not cloned.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        Self {
            items: self
                .items
                .iter()
                .filter(|e| predicate(e))
                .cloned()
                .collect(),
        }
    }

    /// Sort by the kind's natural key. Stable.
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    /// Replace records with a matching primary key in place, append the
    /// rest. Returns how many existing records were replaced.
    pub fn upsert<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let mut replaced = 0;
        for record in records {
            let id = record.id();
            match self.items.iter_mut().find(|e| e.id() == id) {
                Some(slot) => {
                    *slot = Arc::new(record);
                    replaced += 1;
                }
                None => self.items.push(Arc::new(record)),
            }
        }
        replaced
    }

    /// Run every record's own validator, then reject duplicate codes.
    pub fn validate(&self) -> ScopeResult<()> {
        let mut seen: HashMap<&str, u32> = HashMap::with_capacity(self.items.len());
        for entity in &self.items {
            entity.validate()?;
            if let Some(code) = entity.code() {
                if let Some(first_id) = seen.insert(code, entity.id()) {
                    return Err(ValidationError::DuplicateCode {
                        entity_type: T::entity_type(),
                        code: code.to_string(),
                        first_id,
                        second_id: entity.id(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

impl<T: Entity> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.upsert(iter);
        collection
    }
}

impl<T: Entity> From<Vec<T>> for Collection<T> {
    fn from(records: Vec<T>) -> Self {
        records.into_iter().collect()
    }
}

impl<'a, T: Entity> IntoIterator for &'a Collection<T> {
    type Item = &'a Arc<T>;
    type IntoIter = std::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
