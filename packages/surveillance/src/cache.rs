//! Memoization of generated series tables.
//!
//! The cache is an explicit value owned by its caller (server state, CLI
//! session) rather than process-global state. Entries are immutable and
//! shared through [`Arc`]; each key is written at most once and the first
//! writer wins.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use dengue_ews_surveillance_models::{GenerationParams, ObservationRecord};

use crate::SurveillanceError;
use crate::generator::SeriesGenerator;

/// An immutable generated table shared between cache readers.
pub type SeriesTable = Arc<[ObservationRecord]>;

/// Write-once-per-key store of generated tables.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: RwLock<HashMap<GenerationParams, SeriesTable>>,
}

impl SeriesCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for `params`, if any.
    #[must_use]
    pub fn get(&self, params: &GenerationParams) -> Option<SeriesTable> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(params)
            .cloned()
    }

    /// Returns the cached table for `params`, generating and storing it on
    /// a miss.
    ///
    /// Generation runs without holding the lock. If another caller stores
    /// the same key first, its table is returned and this one discarded.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from [`SeriesGenerator::generate`].
    /// Failures are never cached.
    pub fn get_or_generate(
        &self,
        params: &GenerationParams,
        generator: &SeriesGenerator,
    ) -> Result<SeriesTable, SurveillanceError> {
        if let Some(table) = self.get(params) {
            log::debug!("Series cache hit ({} rows)", table.len());
            return Ok(table);
        }

        log::debug!("Series cache miss, generating");
        let table: SeriesTable = generator.generate(params)?.into();

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(params.clone()).or_insert(table)))
    }

    /// Drops every cached table, returning how many were held.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let count = entries.len();
        log::info!("Clearing {count} cached series tables");
        entries.clear();
        count
    }

    /// Number of cached tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dengue_ews_region_models::Region;
    use std::thread;

    fn short_params(seed: Option<u64>) -> GenerationParams {
        GenerationParams::new(
            vec![Region::Bangkok, Region::Songkhla],
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 26).unwrap(),
            seed,
        )
    }

    #[test]
    fn repeated_key_returns_same_table() {
        let cache = SeriesCache::new();
        let generator = SeriesGenerator::default();

        let a = cache.get_or_generate(&short_params(Some(1)), &generator).unwrap();
        let b = cache.get_or_generate(&short_params(Some(1)), &generator).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unseeded_key_is_stable_for_cache_lifetime() {
        let cache = SeriesCache::new();
        let generator = SeriesGenerator::default();

        let a = cache.get_or_generate(&short_params(None), &generator).unwrap();
        let b = cache.get_or_generate(&short_params(None), &generator).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_keys_are_stored_separately() {
        let cache = SeriesCache::new();
        let generator = SeriesGenerator::default();

        cache.get_or_generate(&short_params(Some(1)), &generator).unwrap();
        cache.get_or_generate(&short_params(Some(2)), &generator).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = SeriesCache::new();
        let generator = SeriesGenerator::default();
        let mut params = short_params(Some(1));
        params.regions.clear();

        assert!(cache.get_or_generate(&params, &generator).is_err());
        assert!(cache.is_empty());
        assert!(cache.get(&params).is_none());
    }

    #[test]
    fn clear_forces_regeneration() {
        let cache = SeriesCache::new();
        let generator = SeriesGenerator::default();

        let a = cache.get_or_generate(&short_params(None), &generator).unwrap();
        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());

        let b = cache.get_or_generate(&short_params(None), &generator).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn concurrent_readers_agree_on_first_writer() {
        let cache = Arc::new(SeriesCache::new());
        let generator = SeriesGenerator::default();

        let tables: Vec<SeriesTable> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let cache = Arc::clone(&cache);
                    let generator = generator.clone();
                    s.spawn(move || {
                        cache
                            .get_or_generate(&short_params(None), &generator)
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let stored = cache.get(&short_params(None)).unwrap();
        assert_eq!(cache.len(), 1);
        for table in &tables {
            assert!(Arc::ptr_eq(table, &stored));
        }
    }
}
