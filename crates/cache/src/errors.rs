//! Error taxonomy for the persistence codec
//!
//! These errors never leave the crate as errors: the codec's public entry
//! points translate each of them into a single warning line and return
//! normally, because a missing or corrupt cache file must never abort a
//! solve.

/// Failures while reading or writing a cache file.
///
/// Unopenable files are handled (and logged) before validation starts, so
/// they need no variant here.
#[derive(Debug, thiserror::Error)]
pub enum CacheFileError {
    /// The file could not be statted, is shorter than the signature, or
    /// carries the wrong signature
    #[error("invalid cache file")]
    Invalid,

    /// The byte count past the signature is not a whole number of records
    #[error("cache file has incorrect size")]
    IncorrectSize,

    /// The staging buffer for the full record set could not be allocated
    #[error("insufficient memory to preload cache")]
    OutOfMemory,

    /// The record stream ended early; records before `read` were kept
    #[error("read only {read} of {expected} records")]
    Truncated { read: usize, expected: usize },
}
