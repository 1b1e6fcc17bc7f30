//! Bucket hashing for fingerprint keys
//!
//! A Jenkins one-at-a-time hash over the key's raw bytes: each byte is
//! accumulated with shift/xor mixing, with a final avalanche applied when the
//! value is taken. Fast, non-cryptographic, and deterministic for identical
//! byte patterns; numerically close keys with different bit patterns get
//! unrelated hashes.

use std::hash::{BuildHasher, Hasher};

/// One-at-a-time accumulation hasher
#[derive(Debug, Default, Clone)]
pub struct OneAtATimeHasher {
    state: u64,
}

impl Hasher for OneAtATimeHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.wrapping_add(u64::from(byte));
            self.state = self.state.wrapping_add(self.state << 10);
            self.state ^= self.state >> 6;
        }
    }

    fn finish(&self) -> u64 {
        let mut hash = self.state;
        hash = hash.wrapping_add(hash << 3);
        hash ^= hash >> 11;
        hash.wrapping_add(hash << 15)
    }
}

/// [`BuildHasher`] handing out [`OneAtATimeHasher`] instances, for use as a
/// `HashMap` hasher parameter. Stateless, so every map built with it hashes
/// identically across processes.
#[derive(Debug, Default, Clone)]
pub struct OneAtATimeBuildHasher;

impl BuildHasher for OneAtATimeBuildHasher {
    type Hasher = OneAtATimeHasher;

    fn build_hasher(&self) -> Self::Hasher {
        OneAtATimeHasher::default()
    }
}
