use crate::domain::model::LeaderboardEntry;
use crate::domain::ports::Storage;
use crate::utils::error::{MamError, Result};

/// Best runs, highest score first. Ties keep the earlier entry ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    capacity: usize,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    pub fn from_json(data: &[u8], capacity: usize) -> Result<Self> {
        let mut entries: Vec<LeaderboardEntry> = serde_json::from_slice(data)?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Ok(Self { capacity, entries })
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.entries)?)
    }

    /// A missing file is an empty board.
    pub async fn load<S: Storage>(storage: &S, path: &str, capacity: usize) -> Result<Self> {
        match storage.read_file(path).await {
            Ok(data) => Self::from_json(&data, capacity),
            Err(MamError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No leaderboard at {}, starting a new one", path);
                Ok(Self::new(capacity))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        storage.write_file(path, &self.to_json()?).await
    }

    /// Inserts the entry and returns its 1-based rank, or `None` if it did not make the board.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());

        if position >= self.capacity {
            return None;
        }

        self.entries.insert(position, entry);
        self.entries.truncate(self.capacity);
        Some(position + 1)
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
