//! Fan-out of state changes to live subscribers.
//!
//! Every mutation of the current reign or of a leaderboard window is
//! published as a [`HillEvent`]. Each subscriber has an owned mailbox;
//! delivery order to one subscriber matches publish order at the source.
//! Subscribers that drop their receiver are pruned on the next publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::board::LeaderboardEntry;
use crate::reign::Reign;
use crate::types::Window;

/// A state change pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HillEvent {
    /// The current reign was replaced.
    ReignChanged {
        reign: Reign,
        replaced: Option<Reign>,
    },
    /// A window's leaderboard changed; carries the full post-change ranking.
    BoardChanged {
        window: Window,
        entries: Vec<LeaderboardEntry>,
    },
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<HillEvent>;
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<HillEvent>;

/// Publish/subscribe channel for [`HillEvent`]s.
pub struct ChangeFeed {
    subscribers: Mutex<HashMap<u64, EventSender>>,
    next_id: AtomicU64,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a subscriber. The returned handle cancels the subscription
    /// when explicitly cancelled or dropped.
    pub fn subscribe(self: &Arc<Self>) -> (FeedSubscription, EventReceiver) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().insert(id, tx);
        (
            FeedSubscription {
                feed: Arc::downgrade(self),
                id,
            },
            rx,
        )
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&self, event: &HillEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|id, tx| {
            if tx.send(event.clone()).is_err() {
                tracing::debug!(subscriber = id, "feed subscriber gone, pruning");
                false
            } else {
                true
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn unsubscribe(&self, id: u64) {
        self.subscribers.lock().remove(&id);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation handle for one feed subscription.
///
/// Cancellation is idempotent and stops further delivery to this
/// subscriber; deliveries to other subscribers are unaffected.
pub struct FeedSubscription {
    feed: Weak<ChangeFeed>,
    id: u64,
}

impl FeedSubscription {
    pub fn cancel(&self) {
        if let Some(feed) = self.feed.upgrade() {
            feed.unsubscribe(self.id);
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
