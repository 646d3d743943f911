use prometheus::{IntCounter, IntGauge, Opts, Registry};

/// Engine-level prometheus metrics.
pub struct HillMetrics {
    /// Total submissions attempted, including rejected ones.
    pub submissions: IntCounter,
    /// Submissions rejected by name validation.
    pub rejected_names: IntCounter,
    /// Reigns closed out and offered to the leaderboard engine.
    pub reigns_closed: IntCounter,
    /// Distinct entries currently held by at least one window.
    pub board_entries: IntGauge,
}

impl HillMetrics {
    /// Create metrics and register them with the given prometheus registry.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let submissions = IntCounter::with_opts(Opts::new(
            "hill_submissions_total",
            "Total submissions attempted, including rejected ones",
        ))?;
        let rejected_names = IntCounter::with_opts(Opts::new(
            "hill_rejected_names_total",
            "Submissions rejected by name validation",
        ))?;
        let reigns_closed = IntCounter::with_opts(Opts::new(
            "hill_reigns_closed_total",
            "Reigns closed out and offered to the leaderboard engine",
        ))?;
        let board_entries = IntGauge::with_opts(Opts::new(
            "hill_board_entries",
            "Distinct entries currently held by at least one window",
        ))?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(rejected_names.clone()))?;
        registry.register(Box::new(reigns_closed.clone()))?;
        registry.register(Box::new(board_entries.clone()))?;

        Ok(Self {
            submissions,
            rejected_names,
            reigns_closed,
            board_entries,
        })
    }

    /// Create metrics without registering (for testing).
    pub fn unregistered() -> Self {
        Self {
            submissions: IntCounter::new("hill_submissions_total", "submissions")
                .expect("valid metric name"),
            rejected_names: IntCounter::new("hill_rejected_names_total", "rejected")
                .expect("valid metric name"),
            reigns_closed: IntCounter::new("hill_reigns_closed_total", "closed")
                .expect("valid metric name"),
            board_entries: IntGauge::new("hill_board_entries", "entries")
                .expect("valid metric name"),
        }
    }
}
