use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{HighScoreStore, log_save};

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

/// High score kept in a JSON file: `{ "high_score": n }`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    cached: Option<u64>,
}

impl JsonFileStore {
    /// Open the store, reading any existing value
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cached = Self::read(&path);
        match cached {
            Some(score) => log::info!("Loaded high score {} from {}", score, path.display()),
            None => log::info!("No high score at {}, starting fresh", path.display()),
        }
        Self { path, cached }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Option<u64> {
        let json = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<HighScoreFile>(&json) {
            Ok(file) => Some(file.high_score),
            Err(e) => {
                log::warn!("Ignoring corrupt high score file {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn get_high_score(&self) -> Option<u64> {
        self.cached
    }

    fn set_high_score(&mut self, score: u64) {
        self.cached = Some(score);
        let body = HighScoreFile { high_score: score };
        let result = serde_json::to_string(&body)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(&self.path, json));
        log_save(score, &self.path.display().to_string(), result);
    }
}
