//! Folders scored against a query, and the orderings used on them.

mod shorten;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::classify::{self, Rating};
use crate::folder::Folder;

pub use shorten::shorten_path;

/// A folder together with its rating for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedFolder {
    pub folder: Folder,
    pub rating: Rating,
}

impl RatedFolder {
    /// Rate `folder` against `query`. Returns `None` when the basename does not match.
    #[must_use]
    pub fn new(
        folder: &Folder,
        query: &str,
        now: DateTime<Utc>,
        case_sensitive: bool,
    ) -> Option<Self> {
        let rating = Rating::new(query, &folder.path, &folder.times, now, case_sensitive);
        if rating.points() == classify::NO_MATCH {
            return None;
        }
        Some(Self {
            folder: folder.clone(),
            rating,
        })
    }

    /// Rate only by recency, ignoring any query. Used for eviction.
    #[must_use]
    pub fn by_time(folder: Folder, now: DateTime<Utc>) -> Self {
        let rating = Rating {
            similarity_points: classify::NO_MATCH,
            time_points: classify::classify_time(now, &folder.times),
        };
        Self { folder, rating }
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.rating.points()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.folder.path
    }
}

/// Search order: points, then visit count (both descending), then path.
#[must_use]
pub fn ranking_order(a: &RatedFolder, b: &RatedFolder) -> Ordering {
    b.points()
        .cmp(&a.points())
        .then_with(|| b.folder.update_count.cmp(&a.folder.update_count))
        .then_with(|| a.folder.path.cmp(&b.folder.path))
}

/// Eviction order: recency points, then visit count (both descending), then path.
#[must_use]
pub fn recency_order(a: &RatedFolder, b: &RatedFolder) -> Ordering {
    b.rating
        .time_points
        .cmp(&a.rating.time_points)
        .then_with(|| b.folder.update_count.cmp(&a.folder.update_count))
        .then_with(|| a.folder.path.cmp(&b.folder.path))
}

pub fn sort(rated: &mut [RatedFolder]) {
    rated.sort_by(ranking_order);
}

pub fn sort_by_recency(rated: &mut [RatedFolder]) {
    rated.sort_by(recency_order);
}

/// Keep only folders whose parent path contains the `start` segment.
///
/// `start` is trimmed and compared case-insensitively against every
/// non-empty directory segment except the last one. A segment matches when it
/// equals `start`, or still contains `start` once a trailing `start` is cut
/// off. So `go` matches `/joe/go/bin` and `/gopher/x` but not `/joe/hugo/bin`.
/// An empty `start` keeps everything.
pub fn filter_in_path_of(rated: &mut Vec<RatedFolder>, start: &str) {
    let start = start.trim().to_lowercase();
    if start.is_empty() {
        return;
    }
    rated.retain(|r| parent_matches(&r.folder.path, &start));
}

fn parent_matches(path: &str, start: &str) -> bool {
    let parent = match path.rfind(std::path::MAIN_SEPARATOR) {
        Some(idx) => &path[..idx],
        None => return false,
    };
    parent
        .to_lowercase()
        .split(std::path::MAIN_SEPARATOR)
        .filter(|seg| !seg.is_empty())
        .any(|seg| {
            let trimmed = seg.strip_suffix(start).unwrap_or(seg);
            trimmed.is_empty() || trimmed.contains(start)
        })
}

/// Replace each path with its shortened display form.
pub fn shorten_paths(rated: &mut [RatedFolder], max_width: usize) {
    for r in rated {
        r.folder.path = shorten_path(&r.folder.path, max_width);
    }
}
