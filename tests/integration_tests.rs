//! Integration tests for the maybe library.
//!
//! These tests drive the index, search and storage layers together without
//! going through the binary. Folders that must exist on disk live in a
//! temporary directory.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use maybe::classify::{STR_ENDS_WITH, STR_EQUALS, TIME_LESS_THAN_MINUTE};
use maybe::folder::{DirectoryChecker, Folder};
use maybe::index::{Index, Upsert};
use maybe::search::{self, Query, SearchOptions};
use maybe::storage::StorageBackend;
use maybe::storage::local::LocalStorageBackend;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Test helper holding a folder tree on disk.
struct TestTree {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestTree {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Create `relative` below the root and return its absolute path.
    fn mkdir(&self, relative: &str) -> String {
        let path = self.root.join(relative);
        fs::create_dir_all(&path).expect("Failed to create folder");
        path.to_str().expect("temp path is UTF-8").to_string()
    }
}

// =============================================================================
// Ranking
// =============================================================================

mod ranking_tests {
    use super::*;

    fn sample_index() -> Index {
        let mut index = Index::new(1000);
        index.upsert("/home/foo", now() - Duration::days(20), false);
        index.upsert("/home/nfoo", now() - Duration::seconds(10), false);
        index.upsert("/etc/apt", now(), false);
        index
    }

    #[test]
    fn exact_name_beats_recent_suffix() {
        let results = search::search(&sample_index(), "foo", now(), &SearchOptions::default());

        let paths: Vec<&str> = results.iter().map(|r| r.path()).collect();
        assert_eq!(paths, ["/home/foo", "/home/nfoo"]);
        assert_eq!(results[0].rating.similarity_points, STR_EQUALS);
        assert_eq!(results[1].rating.similarity_points, STR_ENDS_WITH);
        assert_eq!(results[1].rating.time_points, TIME_LESS_THAN_MINUTE);
    }

    #[test]
    fn frequent_folder_ranks_first() {
        let mut index = Index::new(1000);
        index.upsert("/a/music", now(), false);
        index.upsert("/b/music", now(), false);
        index.upsert("/b/music", now(), false);

        let results = search::search(&index, "music", now(), &SearchOptions::default());
        assert_eq!(results[0].path(), "/b/music");
        assert_eq!(results[0].folder.update_count, 2);
    }

    #[test]
    fn same_result_with_any_worker_count() {
        let mut index = Index::new(5000);
        for i in 0..500_i64 {
            index.upsert(&format!("/data/set{i}/proj"), now() - Duration::hours(i), false);
        }

        let reference: Vec<String> = search::search(
            &index,
            "proj",
            now(),
            &SearchOptions {
                case_sensitive: true,
                max_workers: 1,
            },
        )
        .into_iter()
        .map(|r| r.folder.path)
        .collect();

        for workers in [2, 7, 32] {
            let options = SearchOptions {
                case_sensitive: true,
                max_workers: workers,
            };
            let paths: Vec<String> = search::search(&index, "proj", now(), &options)
                .into_iter()
                .map(|r| r.folder.path)
                .collect();
            assert_eq!(paths, reference, "workers = {workers}");
        }
        assert_eq!(reference.len(), 500);
    }

    #[test]
    fn case_insensitive_search() {
        let mut index = Index::new(1000);
        index.upsert("/home/Music", now(), false);

        let options = SearchOptions {
            case_sensitive: false,
            ..SearchOptions::default()
        };
        let results = search::search(&index, "music", now(), &options);
        assert_eq!(results[0].rating.similarity_points, STR_EQUALS);
    }
}

// =============================================================================
// Best match against the file system
// =============================================================================

mod best_match_tests {
    use super::*;

    #[test]
    fn skips_deleted_folders() {
        let tree = TestTree::new();
        let foo = tree.mkdir("home/foo");
        let nfoo = tree.mkdir("home/nfoo");

        let mut index = Index::new(1000);
        index.add(&foo, now());
        index.add(&nfoo, now());
        fs::remove_dir_all(&foo).unwrap();

        let best = search::best_match(
            &index,
            &Query::new("foo"),
            now(),
            &SearchOptions::default(),
            &DirectoryChecker,
        )
        .unwrap();
        assert_eq!(best.path(), nfoo);
        // still known, it might come back
        assert!(index.get(&foo).is_some());
    }

    #[test]
    fn start_keyword_narrows_the_match() {
        let tree = TestTree::new();
        let plain = tree.mkdir("home/foo");
        let in_src = tree.mkdir("src/foo");

        let mut index = Index::new(1000);
        index.add(&in_src, now() - Duration::days(90));
        index.add(&plain, now());

        let options = SearchOptions::default();
        let best = search::best_match(&index, &Query::new("foo"), now(), &options, &DirectoryChecker);
        assert_eq!(best.unwrap().path(), plain);

        let best = search::best_match(
            &index,
            &Query::with_start("src", "foo"),
            now(),
            &options,
            &DirectoryChecker,
        );
        assert_eq!(best.unwrap().path(), in_src);
    }

    #[test]
    fn nothing_in_empty_index() {
        let index = Index::new(1000);
        let best = search::best_match(
            &index,
            &Query::new("foo"),
            now(),
            &SearchOptions::default(),
            &DirectoryChecker,
        );
        assert!(best.is_none());
    }
}

// =============================================================================
// Index bounds
// =============================================================================

mod eviction_tests {
    use super::*;

    #[test]
    fn overflow_keeps_most_recent_two_thirds() {
        let mut index = Index::new(300);
        for i in 0..300_i64 {
            index.upsert(&format!("/old/{i}"), now() - Duration::days(400), false);
        }
        assert_eq!(index.size(), 300);

        let result = index.upsert("/fresh", Utc::now(), false);
        assert_eq!(result, Upsert::Created);
        assert_eq!(index.size(), 200);
        assert!(index.get("/fresh").is_some());
    }

    #[test]
    fn loaded_index_is_trimmed_to_maximum() {
        let folders =
            (0..250_i64).map(|i| Folder::new(format!("/f/{i}"), vec![now() - Duration::hours(i)]));
        let index = Index::from_folders(folders, 200);
        assert!(index.size() <= 200);
        assert!(index.get("/f/0").is_some());
    }
}

// =============================================================================
// Persistence
// =============================================================================

mod storage_tests {
    use super::*;

    #[test]
    fn index_survives_save_and_load() {
        let tree = TestTree::new();
        let storage = LocalStorageBackend::new(&tree.root.join("data"), 1000);

        let mut index = Index::new(1000);
        index.add("/home/me/src/foo", now());
        index.add("/home/me/src/foo", now() + Duration::minutes(1));
        storage.save(&index).unwrap();

        let restored = Index::from_folders(storage.load().unwrap(), 1000);
        assert_eq!(restored.size(), index.size());

        let foo = restored.get("/home/me/src/foo").unwrap();
        assert_eq!(foo.update_count, 2);
        assert_eq!(foo.times[0], now() + Duration::minutes(1));

        let results = search::search(&restored, "foo", now(), &SearchOptions::default());
        assert_eq!(results[0].path(), "/home/me/src/foo");
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let tree = TestTree::new();
        let data_dir = tree.root.join("data");
        let storage = LocalStorageBackend::new(&data_dir, 1000);

        let mut index = Index::new(1000);
        index.add("/x/y", now());
        storage.save(&index).unwrap();
        storage.save(&index).unwrap();

        let names: Vec<String> = fs::read_dir(&data_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["maybe.data"]);
    }
}
