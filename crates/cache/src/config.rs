//! Cache configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a panel-pair cache instance.
///
/// All fields are optional with working defaults, so an empty configuration
/// document yields a plain in-memory cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// File the cache is preloaded from at startup and written back to at
    /// shutdown. `None` disables persistence.
    #[serde(default)]
    pub cache_file: Option<PathBuf>,

    /// Leave records zeroed instead of invoking the integrator. Only for
    /// timing and diagnostic runs; cached results are meaningless.
    #[serde(default)]
    pub skip_compute: bool,
}
