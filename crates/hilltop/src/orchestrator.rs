//! The single mutating entry point: submitting a new holder name.
//!
//! `submit` validates the name, closes out the current reign into the
//! leaderboard engine, opens the new reign, and publishes the resulting
//! state changes. Submissions through one orchestrator are serialized by
//! an async mutex, so a reign is retired into the leaderboard exactly
//! once; callers running multiple orchestrators against one backing store
//! must serialize externally (the stores themselves are last-write-wins).

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::board::FinishedReign;
use crate::clock::Clock;
use crate::config::HillConfig;
use crate::engine::{LeaderboardEngine, RecordOutcome};
use crate::error::HillError;
use crate::feed::{ChangeFeed, EventReceiver, FeedSubscription, HillEvent};
use crate::metrics::HillMetrics;
use crate::reign::{Reign, ReignStore};
use crate::types::Window;
use crate::validate::NameValidator;

/// Result of a successful submission.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// The reign that is now current.
    pub new_reign: Reign,
    /// The reign this submission superseded, if any.
    pub replaced: Option<Reign>,
    /// How the superseded reign fared against the leaderboards.
    /// `None` when there was no reign to close out.
    pub closed: Option<RecordOutcome>,
}

pub struct SubmissionOrchestrator {
    validator: Arc<dyn NameValidator>,
    reigns: Arc<dyn ReignStore>,
    engine: Arc<LeaderboardEngine>,
    feed: Arc<ChangeFeed>,
    clock: Arc<dyn Clock>,
    metrics: Arc<HillMetrics>,
    tick_interval: Duration,
    /// Serializes submissions so a reign cannot be retired twice.
    submit_lock: tokio::sync::Mutex<()>,
}

impl SubmissionOrchestrator {
    pub fn new(
        config: HillConfig,
        validator: Arc<dyn NameValidator>,
        reigns: Arc<dyn ReignStore>,
        engine: Arc<LeaderboardEngine>,
        feed: Arc<ChangeFeed>,
        clock: Arc<dyn Clock>,
        metrics: Arc<HillMetrics>,
    ) -> Result<Self, HillError> {
        config.validate()?;
        Ok(Self {
            validator,
            reigns,
            engine,
            feed,
            clock,
            metrics,
            tick_interval: config.duration_tick_interval,
            submit_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Attempt to take the hill.
    ///
    /// Validation happens before any state is touched. A persistence
    /// failure before the current-reign write leaves the current reign
    /// unchanged; a failure after it is indistinguishable from success and
    /// must not be retried. No failure is fatal: the orchestrator stays
    /// serviceable.
    pub async fn submit(&self, raw_name: &str) -> Result<SubmitOutcome, HillError> {
        self.metrics.submissions.inc();

        let name = match self.validator.validate(raw_name) {
            Ok(name) => name,
            Err(rejection) => {
                self.metrics.rejected_names.inc();
                tracing::debug!(rejection = %rejection, "submission rejected");
                return Err(HillError::InvalidName { rejection });
            }
        };

        let _guard = self.submit_lock.lock().await;
        let now = self.clock.now();

        let closed = match self.reigns.get_current().await? {
            Some(prev) => {
                let finished = FinishedReign::new(
                    prev.holder_name.clone(),
                    prev.duration_secs_at(now),
                    prev.started_at,
                );
                let outcome = self.engine.record(finished).await?;
                self.metrics.reigns_closed.inc();
                Some(outcome)
            }
            None => None,
        };

        let new_reign = Reign::new(name, now);
        let replaced = self.reigns.set_current(new_reign.clone()).await?;

        if let Some(outcome) = &closed {
            for window in &outcome.accepted {
                self.feed.publish(&HillEvent::BoardChanged {
                    window: *window,
                    entries: self.engine.entries(*window),
                });
            }
        }
        self.feed.publish(&HillEvent::ReignChanged {
            reign: new_reign.clone(),
            replaced: replaced.clone(),
        });

        tracing::info!(holder = %new_reign.holder_name, "new reign started");

        Ok(SubmitOutcome {
            new_reign,
            replaced,
            closed,
        })
    }

    /// The reign currently holding the title, if any.
    pub async fn current_reign(&self) -> Result<Option<Reign>, HillError> {
        self.reigns.get_current().await
    }

    /// Elapsed duration of the current reign in seconds, if one exists.
    pub async fn current_duration_secs(&self) -> Result<Option<f64>, HillError> {
        let now = self.clock.now();
        Ok(self
            .reigns
            .get_current()
            .await?
            .map(|reign| reign.duration_secs_at(now)))
    }

    /// Ranked leaderboard for one window.
    pub fn leaderboard(&self, window: Window) -> Vec<crate::board::LeaderboardEntry> {
        self.engine.entries(window)
    }

    /// Subscribe to all state changes (reign transitions and board updates).
    pub fn subscribe(&self) -> (FeedSubscription, EventReceiver) {
        self.feed.subscribe()
    }

    /// Watch raw current-reign replacements from the backing store.
    pub async fn watch_reigns(
        &self,
    ) -> Result<Pin<Box<dyn Stream<Item = Reign> + Send>>, HillError> {
        self.reigns.watch().await
    }

    /// Periodically sample the current reign's elapsed duration, using the
    /// configured tick interval.
    pub fn duration_ticker(&self) -> (DurationTicker, tokio::sync::mpsc::UnboundedReceiver<f64>) {
        self.watch_duration(self.tick_interval)
    }

    /// Periodically sample the current reign's elapsed duration.
    ///
    /// The sampler is a spawned task; it stops when the returned handle is
    /// cancelled or dropped, or when the receiver is dropped. Samples are
    /// pure `now - started_at` reads and never block a submission.
    pub fn watch_duration(
        &self,
        period: Duration,
    ) -> (DurationTicker, tokio::sync::mpsc::UnboundedReceiver<f64>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let task_token = token.clone();
        let reigns = Arc::clone(&self.reigns);
        let clock = Arc::clone(&self.clock);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = tokio::time::sleep(period) => {
                        let current = match reigns.get_current().await {
                            Ok(current) => current,
                            Err(err) => {
                                tracing::warn!(error = %err, "duration ticker read failed");
                                continue;
                            }
                        };
                        if let Some(reign) = current {
                            if tx.send(reign.duration_secs_at(clock.now())).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        (DurationTicker { token }, rx)
    }
}

/// Cancellation handle for a duration sampler. Cancelling is idempotent;
/// dropping the handle cancels too.
pub struct DurationTicker {
    token: CancellationToken,
}

impl DurationTicker {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for DurationTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHill;
    use crate::validate::NameRejection;

    #[tokio::test]
    async fn first_submission_opens_a_reign_without_board_mutation() {
        // Scenario D: no current reign exists yet.
        let hill = TestHill::new();

        let outcome = hill.submit("Carol").await.unwrap();
        assert!(outcome.closed.is_none());
        assert!(outcome.replaced.is_none());
        assert_eq!(outcome.new_reign.holder_name, "Carol");

        assert_eq!(
            hill.orchestrator.current_reign().await.unwrap(),
            Some(outcome.new_reign)
        );
        for window in Window::ALL {
            assert!(hill.orchestrator.leaderboard(window).is_empty());
        }
        assert!(hill.board.is_empty());
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_touching_state() {
        // Scenario E.
        let hill = TestHill::new();
        hill.submit("Carol").await.unwrap();
        hill.advance_secs(60);

        let err = hill.submit("").await.unwrap_err();
        assert!(matches!(
            err,
            HillError::InvalidName {
                rejection: NameRejection::Empty
            }
        ));

        let current = hill.orchestrator.current_reign().await.unwrap().unwrap();
        assert_eq!(current.holder_name, "Carol");
        assert!(hill.board.is_empty());
    }

    #[tokio::test]
    async fn immediate_resubmission_records_zero_duration() {
        // Scenario F: Dave submits at the same instant as Carol.
        let hill = TestHill::new();
        hill.submit("Carol").await.unwrap();

        let outcome = hill.submit("Dave").await.unwrap();
        let closed = outcome.closed.unwrap();
        assert_eq!(closed.entry.holder_name, "Carol");
        assert_eq!(closed.entry.duration_secs, 0.0);
        assert_eq!(closed.accepted, Window::ALL);
    }

    #[tokio::test]
    async fn replacement_closes_prior_reign_with_elapsed_duration() {
        let hill = TestHill::new();
        hill.submit("Alice").await.unwrap();
        hill.advance_secs(120);

        let outcome = hill.submit("Bob").await.unwrap();
        assert_eq!(outcome.replaced.as_ref().unwrap().holder_name, "Alice");

        let closed = outcome.closed.unwrap();
        assert_eq!(closed.entry.duration_secs, 120.0);

        let board = hill.orchestrator.leaderboard(Window::AllTime);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].holder_name, "Alice");
    }

    #[tokio::test]
    async fn profane_name_is_rejected() {
        let hill = TestHill::with_deny_list(["villain"]);
        let err = hill.submit("The Villain").await.unwrap_err();
        assert!(matches!(
            err,
            HillError::InvalidName {
                rejection: NameRejection::Profane
            }
        ));
    }

    #[tokio::test]
    async fn submitted_names_are_trimmed() {
        let hill = TestHill::new();
        let outcome = hill.submit("  Alice  ").await.unwrap();
        assert_eq!(outcome.new_reign.holder_name, "Alice");
    }

    #[tokio::test]
    async fn board_events_precede_the_reign_event() {
        let hill = TestHill::new();
        hill.submit("Alice").await.unwrap();
        hill.advance_secs(60);

        let (_sub, mut rx) = hill.orchestrator.subscribe();
        hill.submit("Bob").await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        // Three accepted windows, then the reign transition.
        assert_eq!(events.len(), 4);
        assert!(events[..3]
            .iter()
            .all(|e| matches!(e, HillEvent::BoardChanged { .. })));
        match &events[3] {
            HillEvent::ReignChanged { reign, replaced } => {
                assert_eq!(reign.holder_name, "Bob");
                assert_eq!(replaced.as_ref().unwrap().holder_name, "Alice");
            }
            other => panic!("expected ReignChanged, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn current_duration_tracks_the_clock() {
        let hill = TestHill::new();
        assert_eq!(hill.orchestrator.current_duration_secs().await.unwrap(), None);

        hill.submit("Alice").await.unwrap();
        hill.advance_secs(42);
        assert_eq!(
            hill.orchestrator.current_duration_secs().await.unwrap(),
            Some(42.0)
        );
    }

    #[tokio::test]
    async fn duration_ticker_samples_and_cancels() {
        let hill = TestHill::new();
        hill.submit("Alice").await.unwrap();
        hill.advance_secs(30);

        let (ticker, mut rx) = hill
            .orchestrator
            .watch_duration(Duration::from_millis(5));
        let sample = rx.recv().await.unwrap();
        assert_eq!(sample, 30.0);

        ticker.cancel();
        ticker.cancel();
        // Channel closes once the task observes cancellation.
        while rx.recv().await.is_some() {}
    }

    #[tokio::test]
    async fn invalid_config_is_refused() {
        let err = TestHill::try_with_config(HillConfig {
            board_capacity: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, HillError::InvalidConfig { .. }));
    }
}
