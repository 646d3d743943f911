//! Composes the three leaderboard windows and the qualification rule.
//!
//! The engine is the sole creator and evictor of leaderboard entries. Each
//! window is guarded by its own lock; offers to different windows are
//! independent, offers within one window are serialized. The board store
//! mirrors the set of entries held by at least one window.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::board::{BoardStore, FinishedReign, LeaderboardEntry};
use crate::clock::Clock;
use crate::error::HillError;
use crate::metrics::HillMetrics;
use crate::types::{EntryId, EntryIdGenerator, Window};
use crate::window::{rank, LeaderboardWindow};

/// Result of recording a finished reign.
#[derive(Debug)]
pub struct RecordOutcome {
    /// The entry allocated for the finished reign.
    pub entry: LeaderboardEntry,
    /// Windows that accepted the entry, in [`Window::ALL`] order.
    pub accepted: Vec<Window>,
}

pub struct LeaderboardEngine {
    store: Arc<dyn BoardStore>,
    clock: Arc<dyn Clock>,
    ids: EntryIdGenerator,
    windows: [Mutex<LeaderboardWindow>; 3],
    metrics: Arc<HillMetrics>,
}

impl LeaderboardEngine {
    pub fn new(
        store: Arc<dyn BoardStore>,
        clock: Arc<dyn Clock>,
        capacity: usize,
        metrics: Arc<HillMetrics>,
    ) -> Self {
        let [w0, w1, w2] = Window::ALL;
        Self {
            store,
            clock,
            ids: EntryIdGenerator::new(),
            windows: [
                Mutex::new(LeaderboardWindow::new(w0, capacity)),
                Mutex::new(LeaderboardWindow::new(w1, capacity)),
                Mutex::new(LeaderboardWindow::new(w2, capacity)),
            ],
            metrics,
        }
    }

    fn slot(&self, window: Window) -> &Mutex<LeaderboardWindow> {
        let index = Window::ALL
            .iter()
            .position(|w| *w == window)
            .expect("Window::ALL covers every variant");
        &self.windows[index]
    }

    fn held_ids(&self) -> HashSet<EntryId> {
        self.windows
            .iter()
            .flat_map(|w| w.lock().held_ids().collect::<Vec<_>>())
            .collect()
    }

    /// Offer a finished reign to every window and mirror the result to the
    /// board store: the entry is persisted if any window accepted it, and
    /// entries no longer held by any window are deleted.
    pub async fn record(&self, finished: FinishedReign) -> Result<RecordOutcome, HillError> {
        let now = self.clock.now();
        let entry = LeaderboardEntry {
            id: self.ids.next(),
            holder_name: finished.holder_name,
            duration_secs: finished.duration_secs,
            signed_at: finished.signed_at,
        };

        // Persist before mutating memory: a store failure here leaves the
        // windows untouched and the submission safely retryable. The engine
        // is the only window mutator and callers serialize record calls, so
        // the dry-run verdict holds through the offers below.
        let qualifies = Window::ALL
            .iter()
            .any(|w| self.slot(*w).lock().would_accept(&entry, now));
        if qualifies {
            self.store.insert(&entry).await?;
        }

        let held_before = self.held_ids();
        let mut accepted = Vec::new();
        for window in Window::ALL {
            if self.slot(window).lock().offer(&entry, now) {
                accepted.push(window);
            }
        }
        let held_after = self.held_ids();

        // Delete failures leave orphans in the store; hydrate() garbage
        // collects them on the next start.
        for id in held_before.difference(&held_after) {
            self.store.delete(*id).await?;
        }

        self.metrics.board_entries.set(held_after.len() as i64);
        tracing::debug!(
            holder = %entry.holder_name,
            duration_secs = entry.duration_secs,
            windows = accepted.len(),
            "recorded finished reign"
        );

        Ok(RecordOutcome { entry, accepted })
    }

    /// Ranked entries for one window, age-filtered as of now.
    pub fn entries(&self, window: Window) -> Vec<LeaderboardEntry> {
        self.slot(window).lock().entries_at(self.clock.now())
    }

    /// Rebuild the windows from the board store. Entries that no longer
    /// qualify for any window (typically aged out) are deleted from the
    /// store. Returns the number of entries retained.
    pub async fn hydrate(&self) -> Result<usize, HillError> {
        let mut persisted = self.store.list().await?;
        persisted.sort_by(rank);

        let now = self.clock.now();
        for entry in &persisted {
            for window in Window::ALL {
                self.slot(window).lock().offer(entry, now);
            }
        }

        let held = self.held_ids();
        for entry in &persisted {
            if !held.contains(&entry.id) {
                self.store.delete(entry.id).await?;
            }
        }

        self.metrics.board_entries.set(held.len() as i64);
        tracing::info!(entries = held.len(), "hydrated leaderboard windows");
        Ok(held.len())
    }
}
