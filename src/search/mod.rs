//! Parallel search over the folder index.
//!
//! Every folder is scored exactly once by a short-lived pool of worker
//! threads. Results arrive in any order; the final order comes from a single
//! sort after all workers are done, so repeated searches over the same index
//! return the same list.

use std::num::NonZeroUsize;
use std::thread;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::folder::{ExistenceChecker, Folder};
use crate::index::Index;
use crate::rated::{self, RatedFolder};

/// Upper bound for search worker threads.
pub const MAX_WORKERS: usize = 32;

/// Options that change how folders are scored.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Score a wrong-case equality lower than an exact one.
    pub case_sensitive: bool,
    /// Maximum number of worker threads per search.
    pub max_workers: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            max_workers: MAX_WORKERS,
        }
    }
}

/// A search request.
///
/// `last` is matched against folder names. The optional `start` narrows the
/// results to folders with a matching segment further up the path, e.g.
/// `start = "src"`, `last = "foo"` finds `/home/me/src/foo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub start: String,
    pub last: String,
}

impl Query {
    #[must_use]
    pub fn new(last: impl Into<String>) -> Self {
        Self {
            start: String::new(),
            last: last.into(),
        }
    }

    #[must_use]
    pub fn with_start(start: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            last: last.into(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

/// Score every folder in `index` against `query` and return the matches, best first.
#[must_use]
pub fn search(
    index: &Index,
    query: &str,
    now: DateTime<Utc>,
    options: &SearchOptions,
) -> Vec<RatedFolder> {
    if index.is_empty() {
        return Vec::new();
    }

    let workers = worker_count(index.size(), options.max_workers);
    let (task_tx, task_rx) = crossbeam_channel::bounded::<&Folder>(workers * 2);
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<RatedFolder>();

    let mut results = thread::scope(|s| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            s.spawn(move || {
                for folder in task_rx {
                    let Some(rated) =
                        RatedFolder::new(folder, query, now, options.case_sensitive)
                    else {
                        continue;
                    };
                    if result_tx.send(rated).is_err() {
                        break;
                    }
                }
            });
        }
        // only the workers hold these now, so the streams close when they finish
        drop(task_rx);
        drop(result_tx);

        for folder in index.folders() {
            if task_tx.send(folder).is_err() {
                break;
            }
        }
        drop(task_tx);

        result_rx.iter().collect::<Vec<_>>()
    });

    rated::sort(&mut results);
    debug!(
        "search {query:?}: {} of {} folders match ({workers} workers)",
        results.len(),
        index.size()
    );
    results
}

/// The best existing folder for `query`.
///
/// Folders the checker reports missing are skipped but stay in the index.
#[must_use]
pub fn best_match(
    index: &Index,
    query: &Query,
    now: DateTime<Utc>,
    options: &SearchOptions,
    checker: &dyn ExistenceChecker,
) -> Option<RatedFolder> {
    let mut results = search(index, &query.last, now, options);
    rated::filter_in_path_of(&mut results, &query.start);
    results.into_iter().find(|r| {
        let exists = checker.exists(r.path());
        if !exists {
            debug!("skip missing folder: {}", r.path());
        }
        exists
    })
}

/// All matches for `query`, best first, with paths optionally shortened for display.
#[must_use]
pub fn list(
    index: &Index,
    query: &Query,
    now: DateTime<Utc>,
    options: &SearchOptions,
    max_width: Option<usize>,
) -> Vec<RatedFolder> {
    let mut results = search(index, &query.last, now, options);
    rated::filter_in_path_of(&mut results, &query.start);
    if let Some(width) = max_width {
        rated::shorten_paths(&mut results, width);
    }
    results
}

fn worker_count(folders: usize, max_workers: usize) -> usize {
    let cpus = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    cpus.min(max_workers).min(folders).max(1)
}
