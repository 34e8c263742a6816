//! Similarity and recency scoring.
//!
//! Every function here is pure and total. A similarity of [`NO_MATCH`] is the
//! normal way of saying "this folder does not match the query"; callers drop
//! such folders from ranked results.

use chrono::{DateTime, Duration, Utc};

pub const TIME_LESS_THAN_MINUTE: u32 = 42;
pub const TIME_LESS_THAN_FIVE_MINUTES: u32 = 39;
pub const TIME_LESS_THAN_HOUR: u32 = 36;
pub const TIME_LESS_THAN_SIX_HOURS: u32 = 33;
pub const TIME_LESS_THAN_TWELVE_HOURS: u32 = 30;
pub const TIME_LESS_THAN_DAY: u32 = 27;
pub const TIME_LESS_THAN_TWO_DAYS: u32 = 24;
pub const TIME_LESS_THAN_WEEK: u32 = 21;
pub const TIME_LESS_THAN_TWO_WEEKS: u32 = 18;
pub const TIME_LESS_THAN_MONTH: u32 = 15;
pub const TIME_LESS_THAN_TWO_MONTHS: u32 = 12;
pub const TIME_LESS_THAN_SIX_MONTHS: u32 = 9;
pub const TIME_LESS_THAN_YEAR: u32 = 6;
pub const TIME_OLDER_THAN_A_YEAR: u32 = 0;

pub const STR_EQUALS: u32 = 200;
pub const STR_EQUALS_WRONG_CASE: u32 = 100;
pub const STR_STARTS_WITH: u32 = 80;
pub const STR_ENDS_WITH: u32 = 60;
pub const STR_CONTAINS: u32 = 40;
pub const STR_SIMILAR: u32 = 20;
pub const NO_MATCH: u32 = 0;

const WEEK_HOURS: i64 = 24 * 7;

/// Recency ladder, checked top-down. A timestamp `t` earns the points of the
/// first row where `now < t + duration`.
fn time_ladder() -> [(Duration, u32); 13] {
    [
        (Duration::minutes(1), TIME_LESS_THAN_MINUTE),
        (Duration::minutes(5), TIME_LESS_THAN_FIVE_MINUTES),
        (Duration::hours(1), TIME_LESS_THAN_HOUR),
        (Duration::hours(6), TIME_LESS_THAN_SIX_HOURS),
        (Duration::hours(12), TIME_LESS_THAN_TWELVE_HOURS),
        (Duration::hours(24), TIME_LESS_THAN_DAY),
        (Duration::hours(48), TIME_LESS_THAN_TWO_DAYS),
        (Duration::hours(WEEK_HOURS), TIME_LESS_THAN_WEEK),
        (Duration::hours(WEEK_HOURS * 2), TIME_LESS_THAN_TWO_WEEKS),
        (Duration::hours(WEEK_HOURS * 4), TIME_LESS_THAN_MONTH),
        (Duration::hours(WEEK_HOURS * 4 * 2), TIME_LESS_THAN_TWO_MONTHS),
        (Duration::hours(WEEK_HOURS * 4 * 6), TIME_LESS_THAN_SIX_MONTHS),
        (Duration::hours(WEEK_HOURS * 4 * 12), TIME_LESS_THAN_YEAR),
    ]
}

/// Score of a folder for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rating {
    pub similarity_points: u32,
    pub time_points: u32,
}

impl Rating {
    /// Rate `query` against the basename of `path` and the folder's access times.
    #[must_use]
    pub fn new(
        query: &str,
        path: &str,
        times: &[DateTime<Utc>],
        now: DateTime<Utc>,
        case_sensitive: bool,
    ) -> Self {
        let similarity_points = classify_text(basename(path), query, case_sensitive);
        // A non-match is never rescued by recency, so skip the time work.
        let time_points = if similarity_points == NO_MATCH {
            0
        } else {
            classify_time(now, times)
        };
        Self {
            similarity_points,
            time_points,
        }
    }

    /// Total points. Zero whenever the similarity is [`NO_MATCH`].
    #[must_use]
    pub fn points(&self) -> u32 {
        if self.similarity_points == NO_MATCH {
            return NO_MATCH;
        }
        self.similarity_points.saturating_add(self.time_points)
    }
}

/// Final path segment. The root `/` is its own basename.
#[must_use]
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(std::path::MAIN_SEPARATOR);
    if trimmed.is_empty() {
        return path;
    }
    trimmed
        .rsplit(std::path::MAIN_SEPARATOR)
        .next()
        .unwrap_or(trimmed)
}

/// Sum of [`rate_time`] over all timestamps.
#[must_use]
pub fn classify_time(now: DateTime<Utc>, times: &[DateTime<Utc>]) -> u32 {
    times.iter().map(|t| rate_time(now, *t)).sum()
}

/// Recency points of a single timestamp.
#[must_use]
pub fn rate_time(now: DateTime<Utc>, t: DateTime<Utc>) -> u32 {
    time_ladder()
        .into_iter()
        .find(|(window, _)| {
            t.checked_add_signed(*window)
                .is_none_or(|limit| now < limit)
        })
        .map_or(TIME_OLDER_THAN_A_YEAR, |(_, points)| points)
}

/// Compare a basename with the query; first matching rule wins.
///
/// When the query does not itself start with `.`, a single leading `.` is
/// dropped from `base`, so `.cargo` is an exact hit for `cargo`. With
/// `case_sensitive` off, an equality that differs only in case is scored as
/// [`STR_EQUALS`] instead of [`STR_EQUALS_WRONG_CASE`].
#[must_use]
pub fn classify_text(base: &str, query: &str, case_sensitive: bool) -> u32 {
    let base = match (query.starts_with('.'), base.strip_prefix('.')) {
        (false, Some(stripped)) if !query.is_empty() => stripped,
        _ => base,
    };

    if base == query {
        return STR_EQUALS;
    }

    let base = base.to_lowercase();
    let query = query.to_lowercase();

    if base == query {
        return if case_sensitive {
            STR_EQUALS_WRONG_CASE
        } else {
            STR_EQUALS
        };
    }
    if base.starts_with(&query) {
        return STR_STARTS_WITH;
    }
    if base.ends_with(&query) {
        return STR_ENDS_WITH;
    }
    if base.contains(&query) {
        return STR_CONTAINS;
    }
    similarity(&base, &query)
}

/// Position-by-position character comparison, e.g. `foo` and `foa`.
///
/// Bases shorter than three characters never match. The number of allowed
/// differing positions grows with the base length.
///
/// A leading `.` is dropped from `query` only. When both start with a dot the
/// positions are shifted by one, so `.cargo` and `.carge` do not match.
#[must_use]
pub fn similarity(base: &str, query: &str) -> u32 {
    let base_len = base.chars().count();
    if base_len < 3 {
        return NO_MATCH;
    }

    let max_diff = match base_len {
        0..=4 => 1,
        5..=10 => 2,
        _ => 3,
    };

    let query: Vec<char> = query.strip_prefix('.').unwrap_or(query).chars().collect();
    let diff = base
        .chars()
        .enumerate()
        .filter(|(k, c)| query.get(*k) != Some(c))
        .count();

    if diff <= max_diff {
        STR_SIMILAR
    } else {
        NO_MATCH
    }
}
