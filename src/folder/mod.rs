//! Folder records and the existence check used when resolving a search.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of access timestamps kept per folder.
pub const MAX_TIME_ENTRIES: usize = 6;

/// A known folder with its visit count and most recent access times.
///
/// `times` is always sorted newest-first and never longer than
/// [`MAX_TIME_ENTRIES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub path: String,
    /// How often the folder has been visited. Saturates at `u32::MAX`.
    pub update_count: u32,
    pub times: Vec<DateTime<Utc>>,
}

impl Folder {
    /// Create a record for a first observation of `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty or `times` is empty. Both must hold at every
    /// call site.
    #[must_use]
    pub fn new(path: impl Into<String>, times: Vec<DateTime<Utc>>) -> Self {
        let path = path.into();
        assert!(!path.is_empty(), "folder path must not be empty");
        assert!(!times.is_empty(), "folder needs at least one timestamp");

        Self {
            path,
            update_count: 1,
            times: sort_and_cut(times),
        }
    }

    /// Record another visit at `t`.
    pub fn touch(&mut self, t: DateTime<Utc>) {
        self.update_count = self.update_count.saturating_add(1);
        self.times.push(t);
        self.times = sort_and_cut(std::mem::take(&mut self.times));
    }

    /// Most recent access time.
    #[must_use]
    pub fn last_visit(&self) -> Option<DateTime<Utc>> {
        self.times.first().copied()
    }
}

/// Sort timestamps newest-first and keep only the [`MAX_TIME_ENTRIES`] most recent.
#[must_use]
pub fn sort_and_cut(mut times: Vec<DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    times.sort_unstable_by(|a, b| b.cmp(a));
    times.truncate(MAX_TIME_ENTRIES);
    times
}

/// Answers whether an indexed folder still exists.
///
/// Search results that fail the check are skipped but stay in the index,
/// they might exist again later.
pub trait ExistenceChecker: Sync {
    fn exists(&self, path: &str) -> bool;
}

/// Any `Fn(&str) -> bool` works as a checker.
impl<F> ExistenceChecker for F
where
    F: Fn(&str) -> bool + Sync,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Checks the local filesystem for a directory at the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryChecker;

impl ExistenceChecker for DirectoryChecker {
    fn exists(&self, path: &str) -> bool {
        if path.trim().is_empty() {
            return false;
        }
        Path::new(path).is_dir()
    }
}
