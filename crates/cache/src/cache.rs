//! Cache facade: lookup, on-miss computation, insertion

use crate::config::CacheConfig;
use crate::fingerprint::Fingerprint;
use crate::record::PanelPairRecord;
use crate::table::PairTable;
use quadra_core::Vec3;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Hit/miss counters observed at one point in time
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Process-lifetime memoization cache for panel-pair integral records.
///
/// The cache never evicts: every record lives until the cache itself is
/// dropped, and lookups return shared handles that remain valid afterwards.
/// All methods take `&self`; a cache wrapped in an `Arc` (or the
/// [`global`](crate::global) instance) can be shared freely across worker
/// threads.
#[derive(Debug, Default)]
pub struct PanelPairCache {
    table: PairTable,
    hits: AtomicU64,
    misses: AtomicU64,
    skip_compute: AtomicBool,
}

impl PanelPairCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache configured from `config`.
    pub fn with_config(config: &CacheConfig) -> Self {
        let cache = Self::new();
        cache.set_skip_compute(config.skip_compute);
        cache
    }

    /// Fetch the integral record for an ordered panel pair, computing it on
    /// a miss.
    ///
    /// `panel_a` and `panel_b` must hold canonically ordered corner
    /// coordinates; `shared_vertices` is the number of vertices the panels
    /// have in common and is forwarded unchanged to `compute`. The closure
    /// runs outside any lock, so a slow integrator delays only the calling
    /// thread.
    ///
    /// The miss path is deliberately not atomic end to end: two threads can
    /// miss on the same key, both compute, and both attempt the insert. The
    /// second insert is a no-op, so the table never stores duplicates, and
    /// each thread returns its own (numerically equivalent) record.
    pub fn get_or_compute<F>(
        &self,
        panel_a: &[Vec3; 3],
        panel_b: &[Vec3; 3],
        shared_vertices: usize,
        compute: F,
    ) -> Arc<PanelPairRecord>
    where
        F: FnOnce(&[Vec3; 3], &[Vec3; 3], usize) -> PanelPairRecord,
    {
        let key = Fingerprint::from_panel_pair(panel_a, panel_b);

        if let Some(record) = self.table.find(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return record;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let record = if self.skip_compute.load(Ordering::Relaxed) {
            PanelPairRecord::zeroed()
        } else {
            compute(panel_a, panel_b, shared_vertices)
        };
        let record = Arc::new(record);
        self.table.insert(key, Arc::clone(&record));
        record
    }

    /// Leave records zeroed instead of invoking the integrator. Only useful
    /// for timing and diagnostic runs.
    pub fn set_skip_compute(&self, skip: bool) {
        self.skip_compute.store(skip, Ordering::Relaxed);
    }

    /// Counters and entry count at this instant.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.table.len(),
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub(crate) fn table(&self) -> &PairTable {
        &self.table
    }
}
