//! maybe - jump to recently and frequently visited folders.
//!
//! Visited folders are recorded with a visit count and their latest access
//! times. A keyword query is scored against every folder name, combined with
//! how recently the folder was used, and the best existing folder wins.
//!
//! # Modules
//!
//! - [`classify`] - Similarity and recency scoring
//! - [`folder`] - Folder records and existence checks
//! - [`rated`] - Scored folders, ranking and filtering
//! - [`index`] - The size-bounded folder index
//! - [`search`] - Parallel search, best match and listing
//! - [`storage`] - Saving and loading the index
//! - [`commands`] - High-level operations (add, search, list, remove, stats)
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod folder;
pub mod index;
pub mod rated;
pub mod search;
pub mod storage;
