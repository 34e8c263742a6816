//! Command implementations behind the CLI.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use tracing::{debug, info};

use crate::config::Config;
use crate::folder::DirectoryChecker;
use crate::index::Index;
use crate::rated::RatedFolder;
use crate::search::{self, Query, SearchOptions};
use crate::storage::local::LocalStorageBackend;
use crate::storage::{StorageBackend, StorageError};

/// Settings for one invocation: the config file merged with command-line overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub max_entries: usize,
    pub search: SearchOptions,
    pub max_width: usize,
    pub verbose: bool,
}

impl Settings {
    /// Merge `config` with the values given on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined.
    pub fn resolve(
        config: &Config,
        data_dir: Option<PathBuf>,
        max_entries: Option<usize>,
        verbose: bool,
    ) -> anyhow::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config.data_dir()?,
        };
        let max_entries = max_entries
            .map_or_else(|| config.max_entries(), |n| n.max(crate::index::MIN_MAX_ENTRIES));

        Ok(Self {
            data_dir,
            max_entries,
            search: config.search_options(),
            max_width: config.display.max_width,
            verbose,
        })
    }

    fn storage(&self) -> LocalStorageBackend {
        LocalStorageBackend::new(&self.data_dir, self.max_entries)
    }
}

/// Summary printed by the stats command.
#[derive(Debug, Clone)]
pub struct Stats {
    pub entries: usize,
    pub max_entries: usize,
    pub data_file: PathBuf,
}

/// Build a query from one or two keywords: `[START] LAST`.
#[must_use]
pub fn query_from(keywords: &[String]) -> Query {
    match keywords {
        [last] => Query::new(last.trim()),
        [start, last, ..] => Query::with_start(start.trim(), last.trim()),
        [] => Query::default(),
    }
}

/// Load the saved index, or start an empty one if nothing was saved yet.
///
/// # Errors
///
/// Returns an error if the saved index exists but cannot be read or decoded.
pub fn load_index(storage: &dyn StorageBackend, max_entries: usize) -> anyhow::Result<Index> {
    match storage.load() {
        Ok(folders) => Ok(Index::from_folders(folders, max_entries)),
        Err(StorageError::NotFound(path)) => {
            debug!("no index at {path}, starting empty");
            Ok(Index::new(max_entries))
        }
        Err(e) => Err(e).context("cannot load folder index"),
    }
}

/// Record a visit of `path` and save the index.
///
/// Relative paths are resolved against the current directory, and `.` and
/// `..` are resolved without following symlinks.
///
/// # Returns
///
/// The absolute path that was recorded.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8 or the index cannot be
/// loaded or saved.
pub fn add(settings: &Settings, path: &Path) -> anyhow::Result<String> {
    let absolute = std::path::absolute(path)
        .map(|p| clean_path(&p))
        .with_context(|| format!("cannot resolve {}", path.display()))?;
    let Some(path) = absolute.to_str() else {
        anyhow::bail!("Path is not valid UTF-8: {}", absolute.display());
    };
    if path.trim().is_empty() {
        anyhow::bail!("Path cannot be empty");
    }

    let storage = settings.storage();
    let mut index = load_index(&storage, settings.max_entries)?;
    index.add(path, Utc::now());
    storage.save(&index)?;

    info!("added {path}, {} folders indexed", index.size());
    Ok(path.to_string())
}

/// Lexically resolve `.` and `..` components. `..` never climbs above the root.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    cleaned.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_)) | None
                ) {
                    cleaned.pop();
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Find the best existing folder for `query`.
///
/// An absolute path without start filter is returned as is.
///
/// # Errors
///
/// Returns an error if the index cannot be loaded.
pub fn search(settings: &Settings, query: &Query) -> anyhow::Result<Option<String>> {
    if query.start.is_empty() && Path::new(&query.last).is_absolute() {
        return Ok(Some(query.last.clone()));
    }
    if query.is_empty() {
        return Ok(None);
    }

    let index = load_index(&settings.storage(), settings.max_entries)?;
    let best = search::best_match(&index, query, Utc::now(), &settings.search, &DirectoryChecker);
    Ok(best.map(|r| r.folder.path))
}

/// List up to `limit` folders matching `query`, best first.
///
/// Long paths are shortened to the configured display width unless `full`.
///
/// # Errors
///
/// Returns an error if the index cannot be loaded.
pub fn list(
    settings: &Settings,
    query: &Query,
    limit: usize,
    full: bool,
) -> anyhow::Result<Vec<RatedFolder>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let index = load_index(&settings.storage(), settings.max_entries)?;
    let width = (!full).then_some(settings.max_width);
    let mut results = search::list(&index, query, Utc::now(), &settings.search, width);
    results.truncate(limit);
    Ok(results)
}

/// Forget `path`.
///
/// # Returns
///
/// Whether the folder was known.
///
/// # Errors
///
/// Returns an error if the index cannot be loaded or saved.
pub fn remove(settings: &Settings, path: &str) -> anyhow::Result<bool> {
    let storage = settings.storage();
    let mut index = load_index(&storage, settings.max_entries)?;
    if index.remove(path).is_none() {
        return Ok(false);
    }
    storage.save(&index)?;
    Ok(true)
}

/// Index size and location.
///
/// # Errors
///
/// Returns an error if the index cannot be loaded.
pub fn stats(settings: &Settings) -> anyhow::Result<Stats> {
    let storage = settings.storage();
    let index = load_index(&storage, settings.max_entries)?;
    Ok(Stats {
        entries: index.size(),
        max_entries: index.max_entries(),
        data_file: storage.location().to_path_buf(),
    })
}

/// Render list results as a table.
///
/// Verbose output splits the rating into its time and text points.
#[must_use]
pub fn format_list(results: &[RatedFolder], verbose: bool) -> String {
    let mut out = String::new();
    if results.is_empty() {
        return out;
    }

    if verbose {
        out.push_str("Time\tText\tFolder\n");
    } else {
        out.push_str("Rating\tFolder\n");
    }
    for r in results {
        let line = if verbose {
            format!(
                "{}\t{}\t{}\n",
                r.rating.time_points,
                r.rating.similarity_points,
                r.path()
            )
        } else {
            format!("{}\t{}\n", r.points(), r.path())
        };
        out.push_str(&line);
    }
    out
}
