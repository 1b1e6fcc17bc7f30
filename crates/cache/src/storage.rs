//! Flat binary persistence for the panel-pair table
//!
//! File layout, all multi-byte values little-endian:
//!
//! | offset            | field                                          |
//! |-------------------|------------------------------------------------|
//! | 0                 | signature `"PANELCACHE\0"` (11 bytes)          |
//! | 11 + n * 384      | record *n*: 15 key `f64`s then 33 payload `f64`s |
//!
//! Records appear in table iteration order, which is unspecified. The codec
//! encodes field by field rather than dumping in-memory structs, so a file
//! written on one machine reads back on another; files from foreign layouts
//! are rejected by the signature and size checks.
//!
//! Both operations hold the table's write lock for their entire duration,
//! I/O included. That blocks every lookup while a dump or preload runs, a
//! trade worth making because both happen once per process, outside the
//! hot phase of a solve.

use crate::cache::PanelPairCache;
use crate::errors::CacheFileError;
use crate::fingerprint::{Fingerprint, FINGERPRINT_LEN};
use crate::record::{PanelPairRecord, RECORD_FLOAT_COUNT};
use crate::table::{EntryMap, PairTable};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Leading file signature, terminator included
pub(crate) const SIGNATURE: &[u8; SIGNATURE_LEN] = b"PANELCACHE\0";
pub(crate) const SIGNATURE_LEN: usize = 11;

pub(crate) const FINGERPRINT_BYTES: usize = FINGERPRINT_LEN * 8;
pub(crate) const RECORD_BYTES: usize = (FINGERPRINT_LEN + RECORD_FLOAT_COUNT) * 8;

impl PanelPairCache {
    /// Write every cached entry to `path`, truncating any existing file.
    ///
    /// Best-effort: an unopenable target is logged and ignored, and a failed
    /// record write stops the dump early with whatever was written so far.
    /// Nothing is ever raised to the caller.
    pub fn store(&self, path: &Path) {
        let entries = self.table().entries.write();

        let file = match File::create(path) {
            Ok(file) => file,
            Err(err) => {
                warn!(
                    "could not open file '{}': {err} (aborting cache dump)",
                    path.display()
                );
                return;
            }
        };
        info!("writing panel-pair cache to '{}'", path.display());

        let mut writer = BufWriter::new(file);
        let mut written = 0usize;
        if writer.write_all(SIGNATURE).is_ok() {
            let mut buf = [0u8; RECORD_BYTES];
            for (key, record) in entries.iter() {
                key.write_le(&mut buf[..FINGERPRINT_BYTES]);
                record.write_le(&mut buf[FINGERPRINT_BYTES..]);
                if writer.write_all(&buf).is_err() {
                    break;
                }
                written += 1;
            }
        }
        if let Err(err) = writer.flush() {
            warn!(
                "flushing cache file '{}' failed: {err} (dump may be incomplete)",
                path.display()
            );
        }
        info!("wrote {written} cached records");
    }

    /// Populate the table from a file previously written by
    /// [`store`](Self::store).
    ///
    /// Best-effort: an unopenable or invalid file is logged and skipped with
    /// the table untouched. A record stream that ends early keeps the
    /// records read up to that point; there is no rollback. Nothing is ever
    /// raised to the caller.
    pub fn preload(&self, path: &Path) {
        let mut entries = self.table().entries.write();

        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!(
                    "could not open cache file '{}': {err} (skipping cache preload)",
                    path.display()
                );
                return;
            }
        };

        match preload_records(&mut entries, &mut file) {
            Ok(count) => info!(
                "preloaded {count} cached records from '{}'",
                path.display()
            ),
            Err(err) => warn!(
                "cache file '{}': {err} (skipping cache preload)",
                path.display()
            ),
        }
    }
}

/// Validate the signature and size of an open cache file, then stream its
/// records into the (exclusively held) entry map.
fn preload_records(entries: &mut EntryMap, file: &mut File) -> Result<usize, CacheFileError> {
    let metadata = file.metadata().map_err(|_| CacheFileError::Invalid)?;
    let file_size = metadata.len();

    if file_size < SIGNATURE_LEN as u64 {
        return Err(CacheFileError::Invalid);
    }
    let mut signature = [0u8; SIGNATURE_LEN];
    file.read_exact(&mut signature)
        .map_err(|_| CacheFileError::Invalid)?;
    if &signature != SIGNATURE {
        return Err(CacheFileError::Invalid);
    }

    let payload_size = file_size - SIGNATURE_LEN as u64;
    if payload_size % RECORD_BYTES as u64 != 0 {
        return Err(CacheFileError::IncorrectSize);
    }
    let expected = (payload_size / RECORD_BYTES as u64) as usize;

    read_records(entries, file, expected)
}

/// Read `expected` fixed-size records, inserting each into the map as soon
/// as it is decoded. A short read aborts immediately; earlier records stand.
fn read_records<R: Read>(
    entries: &mut EntryMap,
    reader: &mut R,
    expected: usize,
) -> Result<usize, CacheFileError> {
    let mut staging: Vec<u8> = Vec::new();
    staging
        .try_reserve_exact(expected * RECORD_BYTES)
        .map_err(|_| CacheFileError::OutOfMemory)?;
    staging.resize(expected * RECORD_BYTES, 0);

    for index in 0..expected {
        let chunk = &mut staging[index * RECORD_BYTES..(index + 1) * RECORD_BYTES];
        reader
            .read_exact(chunk)
            .map_err(|_| CacheFileError::Truncated {
                read: index,
                expected,
            })?;

        let key = Fingerprint::read_le(&chunk[..FINGERPRINT_BYTES]);
        let record = PanelPairRecord::read_le(&chunk[FINGERPRINT_BYTES..]);
        PairTable::insert_locked(entries, key, Arc::new(record));
    }

    Ok(expected)
}
