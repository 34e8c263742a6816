//! The bounded folder index.
//!
//! Maps a path to its [`Folder`] record and keeps the number of records under
//! a configured maximum by evicting the least recently used ones.

use std::collections::HashMap;
use std::path::MAIN_SEPARATOR;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::folder::Folder;
use crate::rated::{self, RatedFolder};

/// Default maximum number of folders kept in the index.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Smallest maximum accepted from configuration.
pub const MIN_MAX_ENTRIES: usize = 200;

/// Version-control folders that are never recorded.
pub const IGNORED_FOLDERS: [&str; 4] = [".git", ".hg", ".svn", ".bzr"];

/// Outcome of an [`Index::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new record was created.
    Created,
    /// An existing record got a new visit.
    Updated,
    /// A known sub-folder was seen again; nothing changed.
    Unchanged,
}

/// Path to folder record map with a size cap.
#[derive(Debug, Clone)]
pub struct Index {
    folders: HashMap<String, Folder>,
    max_entries: usize,
}

impl Index {
    /// Create an empty index holding at most `max_entries` folders.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            folders: HashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Build an index from previously stored records.
    ///
    /// If there are more records than `max_entries`, the least recent are
    /// dropped the same way an overflowing insert would.
    #[must_use]
    pub fn from_folders(folders: impl IntoIterator<Item = Folder>, max_entries: usize) -> Self {
        let mut index = Self::new(max_entries);
        index.folders = folders
            .into_iter()
            .map(|f| (f.path.clone(), f))
            .collect();
        if index.folders.len() > index.max_entries {
            index.evict(Utc::now());
        }
        index
    }

    /// Record a visit of `path` at `t`.
    ///
    /// The path itself counts as a real visit. Every ancestor below the
    /// filesystem root is registered as a sub-folder: created when unknown,
    /// left alone otherwise. Levels named like one of [`IGNORED_FOLDERS`] are
    /// skipped.
    pub fn add(&mut self, path: &str, t: DateTime<Utc>) {
        let path = trim_trailing_separators(path.trim());
        if path.is_empty() {
            return;
        }

        let segments: Vec<&str> = path.split(MAIN_SEPARATOR).collect();
        let len = segments.len();
        for i in 0..len.saturating_sub(1).max(1) {
            let name = segments[len - 1 - i];
            let candidate = segments[..len - i].join(&MAIN_SEPARATOR.to_string());
            if name.is_empty() {
                continue;
            }
            if IGNORED_FOLDERS.contains(&name) {
                debug!("ignore: {candidate}");
                continue;
            }
            self.upsert(&candidate, t, i > 0);
        }
    }

    /// Insert `path` or record another visit of it.
    ///
    /// A known path seen as a sub-folder is left unchanged: discovering a
    /// folder is not a visit. Creating a record may push the index over its
    /// maximum, in which case it shrinks to two thirds of the maximum.
    pub fn upsert(&mut self, path: &str, t: DateTime<Utc>, is_subfolder: bool) -> Upsert {
        if let Some(folder) = self.folders.get_mut(path) {
            if is_subfolder {
                return Upsert::Unchanged;
            }
            debug!("update timestamps: {path:?}");
            folder.touch(t);
            return Upsert::Updated;
        }

        if is_subfolder {
            debug!("new sub-folder: {path}");
        } else {
            debug!("new folder: {path}");
        }
        self.folders
            .insert(path.to_string(), Folder::new(path, vec![t]));

        if self.folders.len() > self.max_entries {
            self.evict(Utc::now());
        }
        Upsert::Created
    }

    /// Keep only the `n` most recently and frequently used folders.
    pub fn remove_oldest(&mut self, n: usize, now: DateTime<Utc>) {
        if self.folders.len() <= n {
            return;
        }
        let mut by_time: Vec<RatedFolder> = self
            .folders
            .drain()
            .map(|(_, f)| RatedFolder::by_time(f, now))
            .collect();
        rated::sort_by_recency(&mut by_time);
        by_time.truncate(n);
        self.folders = by_time
            .into_iter()
            .map(|r| (r.folder.path.clone(), r.folder))
            .collect();
    }

    /// Delete a single folder.
    pub fn remove(&mut self, path: &str) -> Option<Folder> {
        self.folders.remove(path)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Folder> {
        self.folders.get(path)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.folders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn folders(&self) -> impl ExactSizeIterator<Item = &Folder> {
        self.folders.values()
    }

    fn evict(&mut self, now: DateTime<Utc>) {
        let before = self.folders.len();
        let keep = self.max_entries - self.max_entries / 3;
        self.remove_oldest(keep, now);
        info!(
            "index over {} entries, evicted {}",
            self.max_entries,
            before - self.folders.len()
        );
    }
}

fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(MAIN_SEPARATOR);
    if trimmed.is_empty() && !path.is_empty() {
        // the root itself
        &path[..MAIN_SEPARATOR.len_utf8()]
    } else {
        trimmed
    }
}
