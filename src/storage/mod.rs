//! Persistence of the folder index.
//!
//! The index is written as a `bincode` snapshot compressed with `zstd`.
//! Backends decide where the bytes live; [`encode`] and [`decode`] work on
//! any byte sink or source.

pub mod local;

use std::io::{Read, Write};
use std::path::Path;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::folder::{self, Folder};
use crate::index::{DEFAULT_MAX_ENTRIES, Index};

/// Version of the snapshot layout. Bump on incompatible changes.
pub const FORMAT_VERSION: u32 = 1;

/// Upper bound of one encoded folder record: a long path plus its timestamps.
pub const MAX_RECORD_BYTES: u64 = 8 * 1024;

const COMPRESSION_LEVEL: i32 = 3;

/// Largest snapshot accepted for an index of `max_entries` folders.
///
/// Leaves room for twice the configured size, so an index saved under a
/// larger maximum still loads and is trimmed afterwards.
#[must_use]
pub fn size_limit(max_entries: usize) -> u64 {
    let entries = u64::try_from(max_entries.max(DEFAULT_MAX_ENTRIES)).unwrap_or(u64::MAX);
    entries.saturating_mul(2).saturating_mul(MAX_RECORD_BYTES)
}

fn codec(limit: u64) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(limit)
}

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No index has been saved yet. Start with an empty one.
    #[error("No saved index at {0}")]
    NotFound(String),

    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error("Failed to write: {0}")]
    WriteError(String),

    /// The saved index cannot be decoded. Never silently replaced.
    #[error("Corrupt index data: {0}")]
    Corrupt(String),

    #[error("Failed to serialize: {0}")]
    SerializeError(String),
}

/// Trait for places the folder index can be saved to.
pub trait StorageBackend: Send + Sync {
    /// Load all stored folder records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing was saved yet and
    /// `StorageError::Corrupt` if the stored data cannot be decoded.
    fn load(&self) -> Result<Vec<Folder>, StorageError>;

    /// Replace the stored index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the index cannot be written.
    fn save(&self, index: &Index) -> Result<(), StorageError>;

    /// Location of the stored data, for display.
    fn location(&self) -> &Path;
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    folders: Vec<&'a Folder>,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    folders: Vec<Folder>,
}

/// Write `index` to `writer`.
///
/// # Errors
///
/// Returns `StorageError::SerializeError` if encoding fails or the snapshot
/// would exceed [`size_limit`], and `StorageError::WriteError` if the writer
/// fails.
pub fn encode<W: Write>(writer: W, index: &Index) -> Result<(), StorageError> {
    let mut folders: Vec<&Folder> = index.folders().collect();
    folders.sort_unstable_by(|a, b| a.path.cmp(&b.path));
    let snapshot = SnapshotRef {
        version: FORMAT_VERSION,
        folders,
    };

    let mut encoder = zstd::stream::write::Encoder::new(writer, COMPRESSION_LEVEL)
        .map_err(|e| StorageError::WriteError(e.to_string()))?;
    codec(size_limit(index.max_entries()))
        .serialize_into(&mut encoder, &snapshot)
        .map_err(|e| StorageError::SerializeError(e.to_string()))?;
    encoder
        .finish()
        .and_then(|mut w| w.flush())
        .map_err(|e| StorageError::WriteError(e.to_string()))
}

/// Read folder records written by [`encode`] for an index of at most
/// `max_entries` folders.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the data is not a valid snapshot of the
/// current [`FORMAT_VERSION`], is larger than [`size_limit`], or holds a
/// folder without path or timestamps.
pub fn decode<R: Read>(reader: R, max_entries: usize) -> Result<Vec<Folder>, StorageError> {
    let decoder = zstd::stream::read::Decoder::new(reader)
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;
    let snapshot: Snapshot = codec(size_limit(max_entries))
        .deserialize_from(decoder)
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;

    if snapshot.version != FORMAT_VERSION {
        return Err(StorageError::Corrupt(format!(
            "format version mismatch: expected {FORMAT_VERSION}, got {}",
            snapshot.version
        )));
    }

    snapshot
        .folders
        .into_iter()
        .map(|mut f| {
            if f.path.is_empty() || f.times.is_empty() {
                return Err(StorageError::Corrupt(format!(
                    "invalid folder record {:?}",
                    f.path
                )));
            }
            f.times = folder::sort_and_cut(f.times);
            Ok(f)
        })
        .collect()
}
