//! The current reign and its storage contract.
//!
//! Exactly one reign is current at any time (or none, before the first
//! submission). A reign's duration is derived from the clock, never stored.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::HillError;

/// A contiguous interval during which one name holds the title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reign {
    pub holder_name: String,
    pub started_at: DateTime<Utc>,
}

impl Reign {
    pub fn new(holder_name: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            holder_name: holder_name.into(),
            started_at,
        }
    }

    /// Elapsed duration in seconds at `now`, clamped to zero.
    ///
    /// The clamp covers clock skew between the instant the reign was
    /// persisted and the instant it is observed.
    pub fn duration_secs_at(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.started_at).num_milliseconds();
        (millis.max(0) as f64) / 1000.0
    }
}

/// Render a duration in seconds as `"Xd Xh Xm Xs"`.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

/// Storage backend for the singleton current-reign record.
///
/// Backends are document stores with change notification; no transaction
/// support is assumed. `set_current` is last-write-wins.
#[async_trait]
pub trait ReignStore: Send + Sync {
    /// Read the current reign, if any.
    async fn get_current(&self) -> Result<Option<Reign>, HillError>;

    /// Replace the current reign, returning the reign it superseded.
    async fn set_current(&self, reign: Reign) -> Result<Option<Reign>, HillError>;

    /// Watch for future `set_current` results. The stream ends when the
    /// store shuts down or the receiver is dropped.
    async fn watch(&self) -> Result<Pin<Box<dyn Stream<Item = Reign> + Send>>, HillError>;
}
