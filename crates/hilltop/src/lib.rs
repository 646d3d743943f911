//! Reign tracking and multi-window leaderboard engine.
//!
//! Tracks the single current holder of a contested title, records the
//! duration of each finished reign, and maintains three bounded ranked
//! leaderboards (all-time, last 30 days, last 7 days), keeping live
//! subscribers synchronized as reigns end and the boards change.
//!
//! The flow: a submission enters [`orchestrator::SubmissionOrchestrator`],
//! is validated by a [`validate::NameValidator`], closes out the current
//! reign held in a [`reign::ReignStore`], offers it to the
//! [`engine::LeaderboardEngine`], and every resulting mutation is pushed
//! through the [`feed::ChangeFeed`].
//!
//! Storage is consumed through the [`reign::ReignStore`] and
//! [`board::BoardStore`] traits; `storage` ships in-memory backends for
//! tests and single-process use.

pub mod board;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod metrics;
pub mod orchestrator;
pub mod reign;
pub mod storage;
pub mod testing;
pub mod types;
pub mod validate;
pub mod window;

/// Prelude module for convenient glob imports.
pub mod prelude {
    pub use crate::board::{BoardStore, FinishedReign, LeaderboardEntry};
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::HillConfig;
    pub use crate::engine::{LeaderboardEngine, RecordOutcome};
    pub use crate::error::HillError;
    pub use crate::feed::{ChangeFeed, FeedSubscription, HillEvent};
    pub use crate::orchestrator::{DurationTicker, SubmissionOrchestrator, SubmitOutcome};
    pub use crate::reign::{format_duration, Reign, ReignStore};
    pub use crate::types::{EntryId, Window};
    pub use crate::validate::{
        DefaultNameValidator, DenyListFilter, NameRejection, NameValidator, PermissiveFilter,
        ProfanityFilter,
    };
    pub use crate::window::LeaderboardWindow;
}
