//! High score persistence
//!
//! The core only ever stores a single number. Backends:
//! - `MemoryStore`: process memory (tests, headless runs)
//! - `JsonFileStore`: small JSON file (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Storage failures are logged and read back as "no high score".

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key/value access to the persisted high score
pub trait HighScoreStore {
    /// Stored high score, or `None` if nothing was saved yet
    fn get_high_score(&self) -> Option<u64>;
    fn set_high_score(&mut self, score: u64);
}

/// In-memory store; counts writes so callers can observe persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(score: u64) -> Self {
        Self {
            value: Some(score),
            writes: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn get_high_score(&self) -> Option<u64> {
        self.value
    }

    fn set_high_score(&mut self, score: u64) {
        self.value = Some(score);
        self.writes += 1;
    }
}

/// Log where a save went, or why it failed; returns whether it succeeded
fn log_save<E: std::fmt::Display>(score: u64, target: &str, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => {
            log::info!("High score {} saved to {}", score, target);
            true
        }
        Err(e) => {
            log::warn!("Failed to save high score to {}: {}", target, e);
            false
        }
    }
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for Box<T> {
    fn get_high_score(&self) -> Option<u64> {
        (**self).get_high_score()
    }

    fn set_high_score(&mut self, score: u64) {
        (**self).set_high_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_high_score(), None);
        store.set_high_score(42);
        assert_eq!(store.get_high_score(), Some(42));
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_log_save_reports_failure() {
        assert!(log_save::<String>(10, "memory", Ok(())));
        assert!(!log_save(10, "LocalStorage", Err("QuotaExceededError".to_string())));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn HighScoreStore> = Box::new(MemoryStore::with_high_score(5));
        assert_eq!(store.get_high_score(), Some(5));
        store.set_high_score(9);
        assert_eq!(store.get_high_score(), Some(9));
    }
}
