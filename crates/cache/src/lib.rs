//! Panel-pair integral cache for quadra
//!
//! This crate memoizes the expensive panel-pair quadrature computation at the
//! heart of a boundary-element solve. Pairs of triangular panels that are
//! translated copies of one another share the same relative geometry, so
//! their integral moments are computed once and reused:
//!
//! - translation-invariant geometric fingerprints as cache keys
//! - tolerance-based key matching on top of an exact-byte bucket hash
//! - shared-read / exclusive-write concurrent access
//! - a flat binary file format for carrying the cache across runs
//!
//! Lookups go through [`PanelPairCache::get_or_compute`]; the integrator
//! itself is supplied by the caller as a closure and invoked only on a miss.

pub mod cache;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod global;
pub mod hashing;
pub mod record;
pub mod storage;
pub mod table;

pub use cache::{CacheStats, PanelPairCache};
pub use config::CacheConfig;
pub use errors::CacheFileError;
pub use fingerprint::{Fingerprint, FINGERPRINT_LEN, RELATIVE_TOLERANCE};
pub use global::{global, preload_cache, store_cache};
pub use hashing::{OneAtATimeBuildHasher, OneAtATimeHasher};
pub use record::{PanelPairRecord, RECORD_FLOAT_COUNT};
pub use table::PairTable;
