use serde::{Deserialize, Serialize};
use std::fmt;

/// Observation window over which a leaderboard is maintained.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Window {
    AllTime,
    Last30Days,
    Last7Days,
}

impl Window {
    /// All windows, in the order they are composed by the engine.
    pub const ALL: [Window; 3] = [Window::AllTime, Window::Last30Days, Window::Last7Days];

    /// Retention period for timed windows. `None` means unbounded.
    pub fn retention(&self) -> Option<chrono::Duration> {
        match self {
            Window::AllTime => None,
            Window::Last30Days => Some(chrono::Duration::days(30)),
            Window::Last7Days => Some(chrono::Duration::days(7)),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Window::AllTime => "all-time",
            Window::Last30Days => "last-30-days",
            Window::Last7Days => "last-7-days",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_periods() {
        assert_eq!(Window::AllTime.retention(), None);
        assert_eq!(
            Window::Last30Days.retention(),
            Some(chrono::Duration::days(30))
        );
        assert_eq!(
            Window::Last7Days.retention(),
            Some(chrono::Duration::days(7))
        );
    }
}
