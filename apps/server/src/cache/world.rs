//! Lazily-built world cache.
//!
//! The mapping from id to world row is loaded from `cachedworld` the first
//! time any handler needs it and stored serialized under a single well-known
//! key. Population is check-then-load-then-store with no mutual exclusion:
//! concurrent first callers can each observe a miss and each run the full load,
//! each overwriting the stored value. Every load reads the same table, so the
//! stored value converges regardless of how many loads race. The contract is
//! "at-least-once, idempotent", not "exactly-once"; a single-flight guard
//! would be a behavior change and is deliberately not installed.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::cache::store::CacheStore;
use crate::db::executor::DbHandle;
use crate::drift::drift;
use crate::error::AppError;
use crate::models::World;

pub const CACHE_KEY: &str = "worldCache";

const SELECT_CACHED_WORLDS: &str = "SELECT id, randomnumber FROM cachedworld";

/// Populates the cache if the key is absent, using `load` to produce the
/// mapping. Returns without loading when the key is already present.
pub async fn ensure_populated<F, Fut>(store: &CacheStore, load: F) -> Result<(), AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<BTreeMap<i32, World>, AppError>>,
{
    if store.get(CACHE_KEY).is_some() {
        return Ok(());
    }

    let worlds = load().await?;
    debug!(entries = worlds.len(), "populating world cache");
    store.set(CACHE_KEY, serde_json::to_string(&worlds)?);
    Ok(())
}

/// Deserializes the current cached mapping, `None` when unpopulated.
/// Each call parses the stored form afresh.
pub fn snapshot(store: &CacheStore) -> Result<Option<BTreeMap<i32, World>>, AppError> {
    match store.get(CACHE_KEY) {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Full-table load of `cachedworld` over a fresh connection.
pub async fn load_from_db(
    url: String,
    query_timeout: Option<Duration>,
) -> Result<BTreeMap<i32, World>, AppError> {
    let conn = DbHandle::connect(&url, query_timeout).await?;
    let rows = drift(conn.query(SELECT_CACHED_WORLDS, Vec::new())).await?;

    let mut worlds = BTreeMap::new();
    for row in &rows {
        let world = World::from_row(row)?;
        worlds.insert(world.id, world);
    }
    Ok(worlds)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{ensure_populated, snapshot, CACHE_KEY};
    use crate::cache::store::CacheStore;
    use crate::error::AppError;
    use crate::models::World;

    fn worlds(n: i32) -> BTreeMap<i32, World> {
        (1..=n)
            .map(|id| {
                (
                    id,
                    World {
                        id,
                        random_number: id * 31 % 10_000,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn serialized_mapping_round_trips() {
        let original = worlds(100);
        let raw = serde_json::to_string(&original).unwrap();
        let parsed: BTreeMap<i32, World> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, original);
    }

    #[tokio::test]
    async fn miss_triggers_a_load_and_stores_the_result() {
        let store = CacheStore::new();
        ensure_populated(&store, || async { Ok(worlds(5)) })
            .await
            .unwrap();
        assert!(store.get(CACHE_KEY).is_some());
        assert_eq!(snapshot(&store).unwrap().unwrap(), worlds(5));
    }

    #[tokio::test]
    async fn hit_skips_the_loader_entirely() {
        let store = CacheStore::new();
        store.set(CACHE_KEY, serde_json::to_string(&worlds(3)).unwrap());
        ensure_populated(&store, || async {
            panic!("loader must not run on a cache hit")
        })
        .await
        .unwrap();
        assert_eq!(snapshot(&store).unwrap().unwrap(), worlds(3));
    }

    #[tokio::test]
    async fn failed_load_leaves_the_cache_unpopulated() {
        let store = CacheStore::new();
        let result = ensure_populated(&store, || async {
            Err(AppError::db("table on fire".to_string()))
        })
        .await;
        assert!(result.is_err());
        assert!(store.get(CACHE_KEY).is_none());
        assert!(snapshot(&store).unwrap().is_none());
    }
}
