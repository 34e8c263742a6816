//! Configuration loading for maybe.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

use crate::index::{DEFAULT_MAX_ENTRIES, MIN_MAX_ENTRIES};
use crate::search::{MAX_WORKERS, SearchOptions};

/// Environment variable pointing to an alternative config file.
pub const CONFIG_ENV: &str = "MAYBE_CONFIG";

/// Default display width for listed paths.
pub const DEFAULT_MAX_WIDTH: usize = 64;

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No data directory could be determined, set index.data_dir")]
    NoDataDir,
}

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where the index lives and how large it may grow.
#[derive(Debug, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_max_width")]
    pub max_width: usize,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_true() -> bool {
    true
}

fn default_max_workers() -> usize {
    MAX_WORKERS
}

fn default_max_width() -> usize {
    DEFAULT_MAX_WIDTH
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            data_dir: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            max_workers: default_max_workers(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
        }
    }
}

impl Config {
    /// Load config from `$MAYBE_CONFIG` or ~/.config/maybe/config.toml,
    /// or return defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = Self::config_path() else {
            return Ok(Config::default());
        };

        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "maybe").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Maximum index size, never below [`MIN_MAX_ENTRIES`].
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.index.max_entries.max(MIN_MAX_ENTRIES)
    }

    /// Directory holding the index file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDataDir` if nothing is configured and no home
    /// directory is known.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.index.data_dir {
            return Ok(expand_tilde(dir));
        }
        ProjectDirs::from("", "", "maybe")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(ConfigError::NoDataDir)
    }

    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.search.case_sensitive,
            max_workers: self.search.max_workers.max(1),
        }
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_entries(), DEFAULT_MAX_ENTRIES);
        assert!(config.search.case_sensitive);
        assert_eq!(config.search.max_workers, MAX_WORKERS);
        assert_eq!(config.display.max_width, DEFAULT_MAX_WIDTH);
    }

    #[test]
    fn parse_partial_file() {
        let config: Config = toml::from_str(
            "[index]\nmax_entries = 500\ndata_dir = \"/var/maybe\"\n\n[search]\ncase_sensitive = false\n",
        )
        .unwrap();
        assert_eq!(config.max_entries(), 500);
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/var/maybe"));
        assert!(!config.search_options().case_sensitive);
        assert_eq!(config.search_options().max_workers, MAX_WORKERS);
        assert_eq!(config.display.max_width, DEFAULT_MAX_WIDTH);
    }

    #[test]
    fn max_entries_has_a_floor() {
        let config: Config = toml::from_str("[index]\nmax_entries = 5\n").unwrap();
        assert_eq!(config.max_entries(), MIN_MAX_ENTRIES);
    }

    #[test]
    fn zero_workers_means_one() {
        let config: Config = toml::from_str("[search]\nmax_workers = 0\n").unwrap();
        assert_eq!(config.search_options().max_workers, 1);
    }

    #[test]
    fn tilde_expansion() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(base) = BaseDirs::new() {
            assert_eq!(expand_tilde("~/data"), base.home_dir().join("data"));
        }
    }
}
