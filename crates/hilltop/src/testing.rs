//! In-memory hill for unit and integration testing.
//!
//! Wires the orchestrator to memory stores, a manual clock, and a
//! permissive profanity filter, so submissions can be exercised without
//! any external dependencies and with deterministic time.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::board::BoardStore;
use crate::clock::{Clock, ManualClock};
use crate::config::HillConfig;
use crate::engine::LeaderboardEngine;
use crate::error::HillError;
use crate::feed::ChangeFeed;
use crate::metrics::HillMetrics;
use crate::orchestrator::{SubmissionOrchestrator, SubmitOutcome};
use crate::reign::ReignStore;
use crate::storage::memory_board::MemoryBoardStore;
use crate::storage::memory_reign::MemoryReignStore;
use crate::validate::{DefaultNameValidator, PermissiveFilter, ProfanityFilter};

/// Fixed starting instant for test clocks.
pub fn test_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_750_000_000, 0).unwrap()
}

/// A fully wired in-memory engine for tests.
///
/// # Example
///
/// ```ignore
/// let hill = TestHill::new();
/// hill.submit("Alice").await.unwrap();
/// hill.advance_secs(120);
/// hill.submit("Bob").await.unwrap();
/// assert_eq!(hill.orchestrator.leaderboard(Window::AllTime).len(), 1);
/// ```
pub struct TestHill {
    pub orchestrator: Arc<SubmissionOrchestrator>,
    pub clock: Arc<ManualClock>,
    pub reigns: Arc<MemoryReignStore>,
    pub board: Arc<MemoryBoardStore>,
    pub engine: Arc<LeaderboardEngine>,
    pub feed: Arc<ChangeFeed>,
    pub metrics: Arc<HillMetrics>,
}

impl std::fmt::Debug for TestHill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestHill").finish_non_exhaustive()
    }
}

impl TestHill {
    /// Default configuration, permissive profanity filter.
    pub fn new() -> Self {
        Self::try_with_filter(HillConfig::default(), Arc::new(PermissiveFilter))
            .expect("default TestHill config is valid")
    }

    /// Default configuration with a deny-list profanity filter.
    pub fn with_deny_list<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::try_with_filter(
            HillConfig::default(),
            Arc::new(crate::validate::DenyListFilter::new(words)),
        )
        .expect("default TestHill config is valid")
    }

    /// Custom configuration, permissive profanity filter.
    pub fn try_with_config(config: HillConfig) -> Result<Self, HillError> {
        Self::try_with_filter(config, Arc::new(PermissiveFilter))
    }

    /// Custom configuration and profanity filter.
    pub fn try_with_filter(
        config: HillConfig,
        filter: Arc<dyn ProfanityFilter>,
    ) -> Result<Self, HillError> {
        let clock = Arc::new(ManualClock::new(test_epoch()));
        let reigns = Arc::new(MemoryReignStore::new());
        let board = Arc::new(MemoryBoardStore::new());
        let feed = Arc::new(ChangeFeed::new());
        let metrics = Arc::new(HillMetrics::unregistered());

        let engine = Arc::new(LeaderboardEngine::new(
            Arc::clone(&board) as Arc<dyn BoardStore>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            config.board_capacity,
            Arc::clone(&metrics),
        ));
        let validator = Arc::new(DefaultNameValidator::new(config.max_name_len, filter));
        let orchestrator = Arc::new(SubmissionOrchestrator::new(
            config,
            validator,
            Arc::clone(&reigns) as Arc<dyn ReignStore>,
            Arc::clone(&engine),
            Arc::clone(&feed),
            Arc::clone(&clock) as Arc<dyn Clock>,
            Arc::clone(&metrics),
        )?);

        Ok(Self {
            orchestrator,
            clock,
            reigns,
            board,
            engine,
            feed,
            metrics,
        })
    }

    /// Move the test clock forward.
    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(chrono::Duration::seconds(secs));
    }

    /// Shorthand for submitting through the orchestrator.
    pub async fn submit(&self, name: &str) -> Result<SubmitOutcome, HillError> {
        self.orchestrator.submit(name).await
    }
}

impl Default for TestHill {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Window;

    #[tokio::test]
    async fn harness_wires_a_working_engine() {
        let hill = TestHill::new();
        hill.submit("Alice").await.unwrap();
        hill.advance_secs(100);
        hill.submit("Bob").await.unwrap();

        assert_eq!(hill.orchestrator.leaderboard(Window::AllTime).len(), 1);
        assert_eq!(hill.metrics.submissions.get(), 2);
        assert_eq!(hill.metrics.reigns_closed.get(), 1);
    }

    #[tokio::test]
    async fn metrics_count_rejections() {
        let hill = TestHill::new();
        let _ = hill.submit("").await;
        assert_eq!(hill.metrics.rejected_names.get(), 1);
        assert_eq!(hill.metrics.submissions.get(), 1);
    }
}
