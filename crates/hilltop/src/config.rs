use std::time::Duration;

use crate::error::HillError;

/// Configuration for the reign-tracking engine.
#[derive(Debug, Clone)]
pub struct HillConfig {
    /// Maximum holder-name length in characters. Default: 15.
    pub max_name_len: usize,
    /// Entries retained per leaderboard window. Default: 5.
    pub board_capacity: usize,
    /// Sampling period for the elapsed-duration ticker. Default: 1s.
    pub duration_tick_interval: Duration,
}

impl Default for HillConfig {
    fn default() -> Self {
        Self {
            max_name_len: 15,
            board_capacity: 5,
            duration_tick_interval: Duration::from_secs(1),
        }
    }
}

impl HillConfig {
    /// Validate the configuration, naming the offending field on failure.
    pub fn validate(&self) -> Result<(), HillError> {
        if self.max_name_len == 0 {
            return Err(HillError::InvalidConfig {
                reason: "max_name_len must be greater than zero".into(),
            });
        }
        if self.board_capacity == 0 {
            return Err(HillError::InvalidConfig {
                reason: "board_capacity must be greater than zero".into(),
            });
        }
        if self.duration_tick_interval.is_zero() {
            return Err(HillError::InvalidConfig {
                reason: "duration_tick_interval must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
