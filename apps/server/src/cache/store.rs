//! Process-wide key -> serialized-value store.
//!
//! Plain get/set with no coordination on top. Callers that want
//! check-then-populate semantics get the race that implies; see
//! [`crate::cache::world`] for the documented contract.

use std::sync::Arc;

use dashmap::DashMap;

#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    inner: Arc<DashMap<String, String>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    pub fn set(&self, key: &str, value: String) {
        self.inner.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::CacheStore;

    #[test]
    fn absent_key_reads_as_none() {
        let store = CacheStore::new();
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = CacheStore::new();
        store.set("k", "v".to_string());
        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[test]
    fn set_overwrites_without_complaint() {
        let store = CacheStore::new();
        store.set("k", "first".to_string());
        store.set("k", "second".to_string());
        assert_eq!(store.get("k"), Some("second".to_string()));
    }

    #[test]
    fn clones_share_the_same_entries() {
        let store = CacheStore::new();
        let other = store.clone();
        store.set("k", "v".to_string());
        assert_eq!(other.get("k"), Some("v".to_string()));
    }
}
