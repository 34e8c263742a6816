//! Local filesystem storage backend.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::folder::Folder;
use crate::index::Index;
use crate::storage::{StorageBackend, StorageError, decode, encode};

/// File name of the index inside the data directory.
pub const DATA_FILE: &str = "maybe.data";

/// Storage backend keeping the index in a single file.
pub struct LocalStorageBackend {
    path: PathBuf,
    max_entries: usize,
}

impl LocalStorageBackend {
    /// Create a backend storing an index of up to `max_entries` folders
    /// inside `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path, max_entries: usize) -> Self {
        Self {
            path: data_dir.join(DATA_FILE),
            max_entries,
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("data.tmp")
    }
}

impl StorageBackend for LocalStorageBackend {
    fn load(&self) -> Result<Vec<Folder>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::NotFound(self.path.display().to_string()));
        }

        let file = File::open(&self.path)
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", self.path.display())))?;
        let folders = decode(BufReader::new(file), self.max_entries).map_err(|e| match e {
            StorageError::Corrupt(msg) => {
                StorageError::Corrupt(format!("{}: {msg}", self.path.display()))
            }
            other => other,
        })?;

        debug!("loaded {} folders from {}", folders.len(), self.path.display());
        Ok(folders)
    }

    fn save(&self, index: &Index) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::WriteError(format!("create dir {}: {e}", parent.display()))
            })?;
        }

        // write next to the target, then swap it in
        let temp_path = self.temp_path();
        let file = File::create(&temp_path)
            .map_err(|e| StorageError::WriteError(format!("{}: {e}", temp_path.display())))?;
        encode(&file, index)?;
        file.sync_all()
            .map_err(|e| StorageError::WriteError(format!("{}: {e}", temp_path.display())))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StorageError::WriteError(format!("{}: {e}", self.path.display())))?;

        debug!("saved {} folders to {}", index.size(), self.path.display());
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DEFAULT_MAX_ENTRIES;
    use chrono::Utc;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageBackend::new(dir.path(), DEFAULT_MAX_ENTRIES);
        assert!(matches!(storage.load(), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageBackend::new(&dir.path().join("nested"), DEFAULT_MAX_ENTRIES);

        let mut index = Index::new(50);
        index.add("/home/tux/music", Utc::now());
        storage.save(&index).unwrap();

        let folders = storage.load().unwrap();
        assert_eq!(folders.len(), 3);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageBackend::new(dir.path(), DEFAULT_MAX_ENTRIES);
        fs::write(storage.location(), b"garbage").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
        assert!(err.to_string().contains(DATA_FILE));
    }
}
