//! Leaderboard entries and their storage contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HillError;
use crate::types::EntryId;

/// A completed reign that qualified for at least one window.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: EntryId,
    pub holder_name: String,
    /// Duration of the reign in seconds. Never negative.
    pub duration_secs: f64,
    /// Instant the reign began (when the holder signed the hill).
    pub signed_at: DateTime<Utc>,
}

/// A reign that has just been closed out, prior to entry allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedReign {
    pub holder_name: String,
    pub duration_secs: f64,
    pub signed_at: DateTime<Utc>,
}

impl FinishedReign {
    pub fn new(
        holder_name: impl Into<String>,
        duration_secs: f64,
        signed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            holder_name: holder_name.into(),
            duration_secs,
            signed_at,
        }
    }
}

/// Document-collection backend for leaderboard entries.
///
/// The engine is the sole writer; window membership is derived in memory
/// and never persisted.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// All persisted entries, in no particular order.
    async fn list(&self) -> Result<Vec<LeaderboardEntry>, HillError>;

    /// Persist a new entry.
    async fn insert(&self, entry: &LeaderboardEntry) -> Result<(), HillError>;

    /// Delete an entry. Deleting an unknown ID is not an error.
    async fn delete(&self, id: EntryId) -> Result<(), HillError>;
}
