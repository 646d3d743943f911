use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::board::{BoardStore, LeaderboardEntry};
use crate::error::HillError;
use crate::types::EntryId;

/// In-memory board store for testing and single-process deployments.
pub struct MemoryBoardStore {
    entries: Mutex<HashMap<EntryId, LeaderboardEntry>>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for MemoryBoardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn list(&self) -> Result<Vec<LeaderboardEntry>, HillError> {
        Ok(self.entries.lock().values().cloned().collect())
    }

    async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), HillError> {
        self.entries.lock().insert(entry.id, entry.clone());
        Ok(())
    }

    async fn delete(&self, id: EntryId) -> Result<(), HillError> {
        self.entries.lock().remove(&id);
        Ok(())
    }
}
