//! Scoreboard for the leaderboard service
//!
//! Append-and-trim: every submission is inserted, the list is kept sorted
//! descending by score and cut to the top 10. Usernames are not unique.
//! Optionally backed by a flat JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum number of scores to keep
pub const MAX_SCORES: usize = 10;

/// A single scoreboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u64,
}

/// Incoming submission; both fields are required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreSubmission {
    pub username: Option<String>,
    pub score: Option<u64>,
}

impl ScoreSubmission {
    /// Username must be non-empty and score non-zero
    pub fn into_entry(self) -> Option<ScoreEntry> {
        let username = self.username.filter(|u| !u.is_empty())?;
        let score = self.score.filter(|&s| s > 0)?;
        Some(ScoreEntry { username, score })
    }
}

/// Top-N scoreboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add an entry; returns its rank (1-indexed) or `None` if trimmed off.
    /// Ties keep submission order.
    pub fn submit(&mut self, entry: ScoreEntry) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_SCORES);
        (pos < MAX_SCORES).then_some(pos + 1)
    }

    pub fn scores(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// A snapshot of the board waiting to be written to disk.
/// `seq` grows with every submission so an older snapshot never overwrites
/// a newer one.
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub seq: u64,
    pub path: PathBuf,
    pub entries: Vec<ScoreEntry>,
}

impl PendingSave {
    pub fn write(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(std::io::Error::other)?;
        fs::write(&self.path, json)
    }
}

/// A leaderboard with optional flat-file backing
#[derive(Debug, Clone, Default)]
pub struct LeaderboardStore {
    board: Leaderboard,
    path: Option<PathBuf>,
    seq: u64,
}

impl LeaderboardStore {
    /// Process-memory only
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path` if it exists; saves go back to the same file
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut board = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Vec<ScoreEntry>>(&json) {
                Ok(entries) => {
                    log::info!("Loaded {} scores from {}", entries.len(), path.display());
                    Leaderboard { entries }
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt scores file {}: {}", path.display(), e);
                    Leaderboard::new()
                }
            },
            Err(_) => {
                log::info!("No scores at {}, starting fresh", path.display());
                Leaderboard::new()
            }
        };
        // Files written by hand may be unsorted or too long
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        board.entries.truncate(MAX_SCORES);
        Self {
            board,
            path: Some(path),
            seq: 0,
        }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    /// Record an entry without touching the disk. Returns the rank and, when
    /// file-backed, the snapshot the caller should write.
    pub fn record(&mut self, entry: ScoreEntry) -> (Option<usize>, Option<PendingSave>) {
        let rank = self.board.submit(entry);
        self.seq += 1;
        let pending = self.path.as_ref().map(|path| PendingSave {
            seq: self.seq,
            path: path.clone(),
            entries: self.board.entries.clone(),
        });
        (rank, pending)
    }

    /// Record an entry and write it straight away if file-backed
    pub fn submit(&mut self, entry: ScoreEntry) -> Option<usize> {
        let (rank, pending) = self.record(entry);
        if let Some(save) = pending {
            if let Err(e) = save.write() {
                log::warn!("Failed to save scores to {}: {}", save.path.display(), e);
            }
        }
        rank
    }
}
