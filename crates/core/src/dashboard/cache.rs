//! Query result caching using Moka.
//!
//! Memoizes query results by query shape and predicate so that an unchanged
//! selection is never recomputed. The dataset is immutable for the lifetime of
//! the process, so entries never expire; a fresh process is needed to see a
//! changed dataset.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use tracing::debug;

use super::predicate::Predicate;
use super::query::QueryShape;

/// Cache key: query identity plus the selected values it was run with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Query identity.
    pub shape: QueryShape,
    /// Predicate the query ran under.
    pub predicate: Predicate,
}

/// Hit and miss counters. Every lookup counts as exactly one of the two; a
/// caller that waited on another caller's computation of the same key
/// counts as a hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that ran the computation.
    pub misses: u64,
}

/// Cache for query results.
///
/// Thread-safe and cheap to clone; clones share the same entries. Concurrent
/// lookups of the same missing key run the computation once. Failed
/// computations are not cached.
#[derive(Clone)]
pub struct ResultCache<V> {
    cache: Cache<CacheKey, V>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Creates a cache, bounded to `max_capacity` entries when given.
    #[must_use]
    pub fn with_capacity(max_capacity: Option<u64>) -> Self {
        let builder = Cache::builder();
        let cache = match max_capacity {
            Some(capacity) => builder.max_capacity(capacity).build(),
            None => builder.build(),
        };

        Self {
            cache,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the cached result for `(shape, predicate)`, running `compute`
    /// on a miss and storing its result.
    ///
    /// # Errors
    ///
    /// Returns the computation's error, shared behind an `Arc` so every
    /// waiter on the same key receives it.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        shape: QueryShape,
        predicate: &Predicate,
        compute: F,
    ) -> Result<V, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        let key = CacheKey {
            shape,
            predicate: predicate.clone(),
        };

        let entry = match self
            .cache
            .entry(key)
            .or_try_insert_with(async {
                debug!(shape = %shape, "cache miss, running query");
                compute().await
            })
            .await
        {
            Ok(entry) => entry,
            Err(err) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        };

        if entry.is_fresh() {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(shape = %shape, predicate = %predicate, "cache hit");
        }
        Ok(entry.into_value())
    }

    /// Returns the hit and miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V> Default for ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::FilterSelection;
    use std::sync::atomic::AtomicUsize;

    fn predicate_for(selection: &FilterSelection) -> Predicate {
        Predicate::build(selection)
    }

    #[tokio::test]
    async fn test_cache_miss_then_hit() {
        let cache: ResultCache<Arc<Vec<i32>>> = ResultCache::new();
        let predicate = predicate_for(&FilterSelection::new().with_region("MG"));
        let counter = AtomicUsize::new(0);
        let runs = &counter;

        let compute = move || async move {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(Arc::new(vec![1, 2, 3]))
        };

        let first = cache
            .get_or_compute(QueryShape::RomByYear, &predicate, compute)
            .await
            .unwrap();
        let second = cache
            .get_or_compute(QueryShape::RomByYear, &predicate, compute)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(runs.load(Ordering::SeqCst), 1, "second call must be served from cache");
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[tokio::test]
    async fn test_shape_is_part_of_the_key() {
        let cache: ResultCache<u32> = ResultCache::new();
        let predicate = Predicate::default();

        let a = cache
            .get_or_compute(QueryShape::ValueByClass, &predicate, || async {
                Ok::<_, String>(1)
            })
            .await
            .unwrap();
        let b = cache
            .get_or_compute(QueryShape::TopRegionsByValue, &predicate, || async {
                Ok::<_, String>(2)
            })
            .await
            .unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(cache.stats().misses, 2);
    }

    #[tokio::test]
    async fn test_selection_order_shares_entry() {
        let cache: ResultCache<u32> = ResultCache::new();
        let first = predicate_for(&FilterSelection::new().with_region("MG").with_region("SP"));
        let second = predicate_for(&FilterSelection::new().with_region("SP").with_region("MG"));

        cache
            .get_or_compute(QueryShape::DetailTable, &first, || async { Ok::<_, String>(7) })
            .await
            .unwrap();
        let hit = cache
            .get_or_compute(QueryShape::DetailTable, &second, || async {
                Ok::<_, String>(99)
            })
            .await
            .unwrap();

        assert_eq!(hit, 7);
    }

    #[tokio::test]
    async fn test_same_value_in_other_dimension_is_a_different_key() {
        let cache: ResultCache<u32> = ResultCache::new();
        let as_class = predicate_for(&FilterSelection::new().with_class("Ouro"));
        let as_substance = predicate_for(&FilterSelection::new().with_substance("Ouro"));

        cache
            .get_or_compute(QueryShape::RomByYear, &as_class, || async { Ok::<_, String>(1) })
            .await
            .unwrap();
        let other = cache
            .get_or_compute(QueryShape::RomByYear, &as_substance, || async {
                Ok::<_, String>(2)
            })
            .await
            .unwrap();

        assert_eq!(other, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResultCache<u32> = ResultCache::new();
        let predicate = Predicate::default();

        let failed = cache
            .get_or_compute(QueryShape::RomByYear, &predicate, || async {
                Err::<u32, _>("disk I/O error".to_string())
            })
            .await;
        assert_eq!(failed.unwrap_err().as_str(), "disk I/O error");
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });

        let recovered = cache
            .get_or_compute(QueryShape::RomByYear, &predicate, || async {
                Ok::<_, String>(5)
            })
            .await
            .unwrap();
        assert_eq!(recovered, 5);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_count_one_miss_and_one_hit() {
        let cache: ResultCache<u32> = ResultCache::new();
        let predicate = Predicate::default();
        let counter = AtomicUsize::new(0);
        let runs = &counter;

        let slow = move || async move {
            runs.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok::<_, String>(11)
        };

        let (first, second) = tokio::join!(
            cache.get_or_compute(QueryShape::RomByYear, &predicate, slow),
            cache.get_or_compute(QueryShape::RomByYear, &predicate, slow),
        );

        assert_eq!((first.unwrap(), second.unwrap()), (11, 11));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }
}
