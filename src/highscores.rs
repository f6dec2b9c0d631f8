//! High score persistence
//!
//! A single all-time best. Stored as a small JSON record in the local data
//! dir natively, LocalStorage on web.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Load/save contract the session talks to
pub trait HighScoreStore {
    /// Stored best, or 0 when nothing is stored
    fn load_high_score(&mut self) -> u64;
    fn save_high_score(&mut self, score: u64);
}

/// On-disk / LocalStorage record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// Storage name for the record
pub const STORAGE_NAME: &str = "highscore.json";

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryHighScore {
    pub high_score: u64,
    /// Number of saves seen
    pub saves: usize,
}

impl MemoryHighScore {
    pub fn new(high_score: u64) -> Self {
        Self {
            high_score,
            saves: 0,
        }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn load_high_score(&mut self) -> u64 {
        self.high_score
    }

    fn save_high_score(&mut self, score: u64) {
        self.high_score = score;
        self.saves += 1;
    }
}

/// JSON file store
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileHighScore {
    /// Store in the user's local data dir
    pub fn new() -> Self {
        let path = storage::data_path(STORAGE_NAME);
        if path.is_none() {
            log::warn!("Could not determine data directory for high score");
        }
        Self { path }
    }

    pub fn at(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FileHighScore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileHighScore {
    fn load_high_score(&mut self) -> u64 {
        let Some(path) = &self.path else {
            return 0;
        };
        storage::load_json::<HighScoreRecord>(path)
            .map(|r| r.high_score)
            .unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u64) {
        let Some(path) = &self.path else {
            return;
        };
        storage::save_json(path, &HighScoreRecord { high_score: score });
    }
}

/// LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone)]
pub struct LocalStorageHighScore;

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageHighScore {
    fn load_high_score(&mut self) -> u64 {
        storage::load_local::<HighScoreRecord>(STORAGE_NAME)
            .map(|r| r.high_score)
            .unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u64) {
        storage::save_local(STORAGE_NAME, &HighScoreRecord { high_score: score });
    }
}
