use std::time::Duration;

use crate::cache::store::CacheStore;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection target; handlers open their own connection per invocation.
    db_url: String,
    /// Optional per-query deadline.
    query_timeout: Option<Duration>,
    /// Process-wide cache, shared across workers.
    cache: CacheStore,
}

impl AppState {
    pub fn new(db_url: String, query_timeout: Option<Duration>) -> Self {
        Self {
            db_url,
            query_timeout,
            cache: CacheStore::new(),
        }
    }

    pub fn db_url(&self) -> &str {
        &self.db_url
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }
}
