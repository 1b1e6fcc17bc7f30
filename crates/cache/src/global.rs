//! Process-wide cache instance
//!
//! One cache per process is the intended deployment: every worker thread
//! funnels through the same table so geometry reuse across the whole mesh
//! pays off. The instance is created empty on first touch; call
//! [`preload_cache`] once before the workers start and [`store_cache`] once
//! at shutdown. Independent [`PanelPairCache`] instances can still be
//! constructed directly where isolation is needed, as in tests.

use crate::cache::PanelPairCache;
use once_cell::sync::Lazy;
use std::path::Path;

static GLOBAL_CACHE: Lazy<PanelPairCache> = Lazy::new(PanelPairCache::new);

/// The process-wide panel-pair cache.
pub fn global() -> &'static PanelPairCache {
    &GLOBAL_CACHE
}

/// Populate the process-wide cache from `path`. Call once, early, before
/// concurrent lookups begin. Failures are logged and skipped.
pub fn preload_cache(path: impl AsRef<Path>) {
    GLOBAL_CACHE.preload(path.as_ref());
}

/// Write the process-wide cache to `path`, typically at shutdown or on
/// explicit user request. Failures are logged and skipped.
pub fn store_cache(path: impl AsRef<Path>) {
    GLOBAL_CACHE.store(path.as_ref());
}
