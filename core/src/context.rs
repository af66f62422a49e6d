//! On-disk layout and the active-chapter lifecycle.

use std::fs;
use std::path::PathBuf;

use hashbrown::HashMap;
use thiserror::Error;

use crate::chapter::ChapterStats;
use crate::codec::{path_file, stats_file};
use crate::path::PathInfo;

/// Errors during data directory operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The per-chapter file layout under one data root:
/// `paths/<key>.txt`, `stats/<key>.txt`, `stats/modState.txt`,
/// `summaries/<key>.txt`, `formats.txt`, `live-data/<name>.txt`.
///
/// All writes are whole-file overwrites.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Opens a store, creating the directory layout. A root we cannot create
    /// is unusable, so this is the one fatal file error.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { root: root.into() };
        for dir in ["paths", "stats", "summaries", "live-data"] {
            let path = store.root.join(dir);
            fs::create_dir_all(&path).map_err(|source| StoreError::CreateDir { path, source })?;
        }
        Ok(store)
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn path_file(&self, key: &str) -> PathBuf {
        self.root.join("paths").join(format!("{key}.txt"))
    }

    fn stats_file(&self, key: &str) -> PathBuf {
        self.root.join("stats").join(format!("{key}.txt"))
    }

    fn session_file(&self) -> PathBuf {
        self.root.join("stats").join("modState.txt")
    }

    fn summary_file(&self, key: &str) -> PathBuf {
        self.root.join("summaries").join(format!("{key}.txt"))
    }

    fn formats_file(&self) -> PathBuf {
        self.root.join("formats.txt")
    }

    fn live_file(&self, name: &str) -> PathBuf {
        self.root.join("live-data").join(format!("{name}.txt"))
    }

    /// Loads a chapter's path. Missing file means no path; a malformed file
    /// is logged and also treated as no path.
    pub fn load_path(&self, key: &str) -> Option<PathInfo> {
        let path = self.path_file(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!("failed to read path file {}: {err}", path.display());
                return None;
            }
        };
        match path_file::parse(&text) {
            Ok(info) => Some(info),
            Err(err) => {
                tracing::warn!("malformed path file {}: {err}", path.display());
                None
            }
        }
    }

    /// Loads a chapter's stats, falling back to a fresh empty structure when
    /// the file is missing or malformed.
    pub fn load_stats(&self, key: &str) -> ChapterStats {
        let path = self.stats_file(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("failed to read stats file {}: {err}", path.display());
                }
                return ChapterStats::new(key);
            }
        };
        match stats_file::parse(key, &text) {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(
                    "malformed stats file {}, starting fresh: {err}",
                    path.display()
                );
                ChapterStats::new(key)
            }
        }
    }

    pub fn save_path(&self, key: &str, info: &PathInfo) {
        self.write(self.path_file(key), &path_file::serialize(info));
    }

    pub fn save_stats(&self, stats: &ChapterStats) {
        self.write(self.stats_file(&stats.chapter_key), &stats_file::serialize(stats));
        self.write(self.session_file(), &stats_file::serialize_session(stats));
    }

    pub fn write_summary(&self, key: &str, text: &str) {
        self.write(self.summary_file(key), text);
    }

    pub fn load_formats(&self) -> Option<String> {
        match fs::read_to_string(self.formats_file()) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!("failed to read formats file: {err}");
                None
            }
        }
    }

    pub fn save_formats(&self, text: &str) {
        self.write(self.formats_file(), text);
    }

    pub fn write_live(&self, name: &str, text: &str) {
        self.write(self.live_file(name), text);
    }

    /// A failed save is logged and does not touch in-memory state.
    fn write(&self, path: PathBuf, text: &str) {
        if let Err(err) = fs::write(&path, text) {
            tracing::warn!("failed to write {}: {err}", path.display());
        }
    }
}

/// The single active chapter: its stats and, when one exists, its path.
#[derive(Debug)]
pub struct ChapterContext {
    pub stats: ChapterStats,
    pub path: Option<PathInfo>,
}

impl ChapterContext {
    /// Loads the chapter's path and stats with full tolerance: any broken
    /// file becomes an absent path or fresh stats.
    pub fn open(store: &DataStore, key: &str, chapter_name: &str, campaign_name: &str) -> Self {
        let path = store.load_path(key);
        let mut stats = store.load_stats(key);
        stats.chapter_name = chapter_name.to_string();
        stats.campaign_name = campaign_name.to_string();
        tracing::info!(
            chapter = key,
            rooms = stats.rooms.len(),
            has_path = path.is_some(),
            "opened chapter"
        );
        Self { stats, path }
    }

    pub fn save(&self, store: &DataStore) {
        store.save_stats(&self.stats);
    }

    /// Final save before the context is dropped.
    pub fn close(self, store: &DataStore) {
        self.save(store);
        tracing::info!(chapter = %self.stats.chapter_key, "closed chapter");
    }
}

/// Process-lifetime golden-run history, keyed by chapter: one room name per
/// golden death, oldest first. Survives session resets.
#[derive(Debug, Default)]
pub struct GoldenRunStore {
    runs: HashMap<String, Vec<String>>,
}

impl GoldenRunStore {
    pub fn record(&mut self, chapter_key: &str, room: String) {
        self.runs.entry_ref(chapter_key).or_default().push(room);
    }

    pub fn runs(&self, chapter_key: &str) -> &[String] {
        self.runs.get(chapter_key).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_runs_accumulate_per_chapter() {
        let mut store = GoldenRunStore::default();
        store.record("ch1", "a".to_string());
        store.record("ch1", "b".to_string());
        store.record("ch2", "x".to_string());
        assert_eq!(store.runs("ch1"), ["a", "b"]);
        assert_eq!(store.runs("ch2"), ["x"]);
        assert!(store.runs("ch3").is_empty());
    }
}
