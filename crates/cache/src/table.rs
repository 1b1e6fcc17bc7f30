//! Concurrent fingerprint-to-record table

use crate::fingerprint::Fingerprint;
use crate::hashing::OneAtATimeBuildHasher;
use crate::record::PanelPairRecord;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type EntryMap = HashMap<Fingerprint, Arc<PanelPairRecord>, OneAtATimeBuildHasher>;

/// Associative store from fingerprints to computed records.
///
/// Buckets are selected by the exact-byte one-at-a-time hash and matched
/// within a bucket by the tolerance comparator. A single reader/writer lock
/// guards all access: lookups share it, insertion and the persistence codec
/// take it exclusively.
///
/// The table owns every entry for the lifetime of the cache; lookups hand
/// out `Arc` clones, so a returned record stays valid after the lock is
/// released.
#[derive(Debug, Default)]
pub struct PairTable {
    pub(crate) entries: RwLock<EntryMap>,
}

impl PairTable {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::with_hasher(OneAtATimeBuildHasher)),
        }
    }

    /// Look up a record under a shared lock. Concurrent lookups never block
    /// each other.
    pub fn find(&self, key: &Fingerprint) -> Option<Arc<PanelPairRecord>> {
        let entries = self.entries.read();
        entries.get(key).cloned()
    }

    /// Insert a record under an exclusive lock.
    ///
    /// If a key matching `key` is already present the table is left exactly
    /// as it was and `false` is returned; the incoming record is dropped
    /// rather than replacing the stored one. Callers racing on the same key
    /// each keep their own freshly computed record, but only the first one
    /// lands in the table.
    pub fn insert(&self, key: Fingerprint, record: Arc<PanelPairRecord>) -> bool {
        let mut entries = self.entries.write();
        Self::insert_locked(&mut entries, key, record)
    }

    /// Insert into an already-exclusively-held entry map. Shared with the
    /// persistence codec, which holds the write lock across a whole preload.
    pub(crate) fn insert_locked(
        entries: &mut EntryMap,
        key: Fingerprint,
        record: Arc<PanelPairRecord>,
    ) -> bool {
        match entries.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
