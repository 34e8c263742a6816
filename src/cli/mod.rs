//! CLI interface for maybe.
//!
//! Provides command-line argument parsing using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default number of listed folders.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Command-line interface for maybe.
#[derive(Parser)]
#[command(name = "maybe")]
#[command(author, version, about = "Jump to recently visited folders by keyword", long_about = None)]
pub struct Cli {
    /// Print debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the folder index.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Maximum number of folders kept in the index (at least 200).
    #[arg(long, global = true)]
    pub max_entries: Option<usize>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Keywords of a search: `[START] QUERY`.
#[derive(Args, Debug, Clone)]
pub struct Keywords {
    /// Folder name to look for, optionally preceded by a parent folder filter.
    #[arg(required = true, num_args = 1..=2, value_name = "KEYWORD")]
    pub keywords: Vec<String>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Record a visit of a folder.
    Add {
        /// Folder path; relative paths are resolved against the current directory.
        path: PathBuf,
    },

    /// Print the best matching existing folder.
    Search {
        #[command(flatten)]
        keywords: Keywords,
    },

    /// List matching folders with their rating.
    List {
        #[command(flatten)]
        keywords: Keywords,

        /// Maximum number of folders to print.
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,

        /// Print full paths instead of shortening long ones.
        #[arg(long)]
        full: bool,
    },

    /// Forget a folder.
    Remove {
        /// Folder path as stored in the index.
        path: String,
    },

    /// Show version, index size and data location.
    Stats,
}
