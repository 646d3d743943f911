//! A bounded, ranked set of finished reigns for one observation window.
//!
//! Entries are kept sorted by duration descending, ties broken by earlier
//! `signed_at`. Timed windows additionally age entries out at read time:
//! a stored entry's presence in the result set is always re-checked against
//! the retention period, independent of when it was inserted.

use chrono::{DateTime, Utc};

use crate::board::LeaderboardEntry;
use crate::types::Window;

/// Rank order: longest duration first, earlier signing breaks ties.
/// Entry ID is the final tie-break so ordering is total.
pub(crate) fn rank(a: &LeaderboardEntry, b: &LeaderboardEntry) -> std::cmp::Ordering {
    b.duration_secs
        .total_cmp(&a.duration_secs)
        .then(a.signed_at.cmp(&b.signed_at))
        .then(a.id.cmp(&b.id))
}

fn in_retention(window: Window, signed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match window.retention() {
        None => true,
        Some(retention) => now - signed_at <= retention,
    }
}

/// Bounded ranked collection of leaderboard entries for one window.
pub struct LeaderboardWindow {
    window: Window,
    capacity: usize,
    /// Always sorted by [`rank`]; never longer than `capacity`.
    entries: Vec<LeaderboardEntry>,
}

impl LeaderboardWindow {
    pub fn new(window: Window, capacity: usize) -> Self {
        Self {
            window,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Current entries, age-filtered at read time for timed windows.
    pub fn entries_at(&self, now: DateTime<Utc>) -> Vec<LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|e| in_retention(self.window, e.signed_at, now))
            .cloned()
            .collect()
    }

    /// Entry IDs currently held, ignoring age. Used by the engine to track
    /// which persisted entries any window still references.
    pub fn held_ids(&self) -> impl Iterator<Item = crate::types::EntryId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Whether [`offer`](Self::offer) would accept this candidate, without
    /// mutating the window. Lets the engine persist an entry before
    /// committing it to memory.
    pub fn would_accept(&self, candidate: &LeaderboardEntry, now: DateTime<Utc>) -> bool {
        if !in_retention(self.window, candidate.signed_at, now) {
            return false;
        }
        let live: Vec<&LeaderboardEntry> = self
            .entries
            .iter()
            .filter(|e| in_retention(self.window, e.signed_at, now))
            .collect();
        if live.len() < self.capacity {
            return true;
        }
        let min = live.last().expect("full window is non-empty");
        candidate.duration_secs > min.duration_secs
    }

    /// Propose a finished reign for inclusion. Returns whether it was
    /// accepted. Insertion and eviction are a single step: on return the
    /// window is sorted and within capacity.
    pub fn offer(&mut self, candidate: &LeaderboardEntry, now: DateTime<Utc>) -> bool {
        // Stale candidates never qualify for timed windows, whatever their duration.
        if !in_retention(self.window, candidate.signed_at, now) {
            return false;
        }

        // Aged-out entries no longer defend their slots.
        self.entries
            .retain(|e| in_retention(self.window, e.signed_at, now));

        if self.entries.len() >= self.capacity {
            let min = self
                .entries
                .last()
                .expect("capacity is at least one, so a full window is non-empty");
            // Strictly greater: a tie does not displace an existing holder.
            if candidate.duration_secs <= min.duration_secs {
                return false;
            }
        }

        self.entries.push(candidate.clone());
        self.entries.sort_by(rank);
        // Sorted order puts the smallest duration last, and among equal
        // durations the later-signed entry last, so truncation evicts
        // exactly the entry the tie-break calls for.
        self.entries.truncate(self.capacity);
        true
    }
}
