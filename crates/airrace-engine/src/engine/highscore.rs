//! Top-5 list of the player's round scores and its durable storage.
//!
//! Losing the list is never fatal: every storage failure is logged at debug
//! level and otherwise ignored.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use arrayvec::ArrayVec;

use crate::core::constants::HIGHSCORE_LEN;

/// Fixed storage key; the JSON file is named after it.
pub const HIGHSCORE_KEY: &str = "xnet-airrace-highscores-v1";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("failed to access highscore file {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to encode or decode highscores")]
    Json { source: serde_json::Error },
}

/// Durable storage for the highscore list.
pub trait HighscoreStore: Send + fmt::Debug {
    /// Returns the stored scores, or an empty list if nothing was stored yet.
    fn load(&self) -> Result<Vec<u32>, StoreError>;

    fn save(&self, scores: &[u32]) -> Result<(), StoreError>;
}

/// Stores the list as a JSON array of integers in `<dir>/<HIGHSCORE_KEY>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn in_dir<P>(dir: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            path: dir.as_ref().join(format!("{HIGHSCORE_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HighscoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<u32>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(self.io_error(e)),
        };
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json { source })?;
        Ok(parse_scores(&value))
    }

    fn save(&self, scores: &[u32]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let scores = &scores[..scores.len().min(HIGHSCORE_LEN)];
        let json = serde_json::to_string(scores).map_err(|source| StoreError::Json { source })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Keeps the list in memory only. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: Arc<Mutex<Vec<u32>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stored(&self) -> Vec<u32> {
        self.scores.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl HighscoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<u32>, StoreError> {
        Ok(self.stored())
    }

    fn save(&self, scores: &[u32]) -> Result<(), StoreError> {
        if let Ok(mut stored) = self.scores.lock() {
            stored.clear();
            stored.extend(scores.iter().take(HIGHSCORE_LEN));
        }
        Ok(())
    }
}

/// Accepts any JSON array, keeping the finite non-negative numbers (rounded).
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_scores(value: &serde_json::Value) -> Vec<u32> {
    let Some(items) = value.as_array() else {
        return vec![];
    };
    items
        .iter()
        .filter_map(serde_json::Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round().min(f64::from(u32::MAX)) as u32)
        .collect()
}

/// The best [`HIGHSCORE_LEN`] round scores, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highscores {
    scores: ArrayVec<u32, HIGHSCORE_LEN>,
}

impl Highscores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the list from `store`, falling back to an empty list on failure.
    #[must_use]
    pub fn load(store: &dyn HighscoreStore) -> Self {
        match store.load() {
            Ok(mut scores) => {
                scores.sort_unstable_by(|a, b| b.cmp(a));
                Self {
                    scores: scores.into_iter().take(HIGHSCORE_LEN).collect(),
                }
            }
            Err(e) => {
                tracing::debug!("ignoring unreadable highscores: {e}");
                Self::new()
            }
        }
    }

    /// Writes the list to `store`, ignoring failures.
    pub fn save(&self, store: &dyn HighscoreStore) {
        if let Err(e) = store.save(&self.scores) {
            tracing::debug!("ignoring highscore save failure: {e}");
        }
    }

    /// Adds a round score, keeping the list sorted descending and truncated.
    pub fn insert(&mut self, score: u32) {
        let mut all: Vec<u32> = self.scores.iter().copied().collect();
        all.push(score);
        all.sort_unstable_by(|a, b| b.cmp(a));
        self.scores = all.into_iter().take(HIGHSCORE_LEN).collect();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.scores
    }

    #[must_use]
    pub fn best(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sorts_and_truncates() {
        let mut scores = Highscores::new();
        for s in [3, 9, 1, 4, 7, 5] {
            scores.insert(s);
        }
        assert_eq!(scores.as_slice(), &[9, 7, 5, 4, 3]);
        scores.insert(0);
        assert_eq!(scores.as_slice(), &[9, 7, 5, 4, 3]);
        scores.insert(8);
        assert_eq!(scores.as_slice(), &[9, 8, 7, 5, 4]);
        assert_eq!(scores.best(), Some(9));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path().join("nested"));
        let mut scores = Highscores::load(&store);
        assert!(scores.is_empty(), "missing file means empty list");

        scores.insert(4);
        scores.insert(11);
        scores.save(&store);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "[11,4]");
        assert_eq!(Highscores::load(&store), scores);
    }

    #[test]
    fn test_load_filters_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), r#"[5, "x", 2.6, -1, null, 8, 1, 0, 3]"#).unwrap();
        assert_eq!(Highscores::load(&store).as_slice(), &[8, 5, 3, 3, 1]);

        fs::write(store.path(), r#"{"scores": [1, 2]}"#).unwrap();
        assert!(Highscores::load(&store).is_empty());
    }

    #[test]
    fn test_load_sorts_unsorted_store() {
        let store = MemoryStore::new();
        store.save(&[2, 9, 4]).unwrap();
        let scores = Highscores::load(&store);
        assert_eq!(scores.best(), Some(9));
        assert_eq!(scores.as_slice(), &[9, 4, 2]);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().is_err());
        assert!(Highscores::load(&store).is_empty());
    }

    #[test]
    fn test_unwritable_location_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        // A regular file where the directory should be.
        let store = JsonFileStore::in_dir(&blocker);
        let mut scores = Highscores::new();
        scores.insert(1);
        assert!(store.save(scores.as_slice()).is_err());
        scores.save(&store);
    }

    #[test]
    fn test_memory_store_shares_state() {
        let store = MemoryStore::new();
        let shared = store.clone();
        let mut scores = Highscores::new();
        scores.insert(2);
        scores.save(&store);
        assert_eq!(shared.stored(), vec![2]);
    }
}
