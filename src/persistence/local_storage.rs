use super::{HighScoreStore, log_save};

/// High score kept in browser LocalStorage
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "alitu_runner_high_score";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl HighScoreStore for LocalStorageStore {
    fn get_high_score(&self) -> Option<u64> {
        let value = Self::storage()?.get_item(Self::STORAGE_KEY).ok()??;
        match value.parse() {
            Ok(score) => Some(score),
            Err(_) => {
                log::warn!("Ignoring malformed stored high score {:?}", value);
                None
            }
        }
    }

    fn set_high_score(&mut self, score: u64) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score not saved");
            return;
        };
        let result = storage
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|e| format!("{:?}", e));
        log_save(score, "LocalStorage", result);
    }
}
