//! In-process cache store

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::{CacheEntry, CacheStore};
use crate::error::CacheError;

/// Cache store backed by a map, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry with an explicit creation time
    pub fn insert_at(&self, key: &str, value: &str, created_at: DateTime<Utc>) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                value: value.to_string(),
                created_at,
            },
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.insert_at(key, value, Utc::now())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let store = MemoryCacheStore::new();
        store.put("k", "v1").unwrap();
        store.put("k", "v2").unwrap();

        let entry = store.get("k").unwrap().unwrap();
        assert_eq!(entry.value, "v2");
        assert_eq!(store.len(), 1);

        store.delete("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_at_keeps_timestamp() {
        let store = MemoryCacheStore::new();
        let then = Utc::now() - chrono::Duration::days(3);
        store.insert_at("old", "v", then).unwrap();

        assert_eq!(store.get("old").unwrap().unwrap().created_at, then);
    }
}
