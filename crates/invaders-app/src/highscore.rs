//! JSON-file high-score store.
//!
//! Best-effort persistence behind the `HighScoreStore` trait: a
//! missing or unreadable file reads as zero, and write errors are
//! returned for the engine to surface as a diagnostic — they never
//! interrupt play.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use invaders_core::traits::HighScoreStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// Stores the high score as a small JSON document on disk.
pub struct JsonFileHighScoreStore {
    path: PathBuf,
}

impl JsonFileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonFileHighScoreStore {
    fn read_high_score(&self) -> u32 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str::<HighScoreFile>(&raw).ok())
            .map(|file| file.high_score)
            .unwrap_or(0)
    }

    fn write_high_score(&mut self, score: u32) -> Result<(), String> {
        let raw = serde_json::to_string(&HighScoreFile { high_score: score })
            .map_err(|e| e.to_string())?;
        fs::write(&self.path, raw).map_err(|e| e.to_string())
    }
}
