use crate::validate::NameRejection;

/// Errors that can occur in the reign-tracking engine.
#[derive(Debug, thiserror::Error)]
pub enum HillError {
    #[error("invalid name: {rejection}")]
    InvalidName {
        #[source]
        rejection: NameRejection,
    },

    #[error("persistence error: {reason}")]
    PersistenceError {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("engine is shutting down")]
    ShuttingDown,
}

impl HillError {
    /// Shorthand for a persistence failure without an underlying cause.
    pub fn persistence(reason: impl Into<String>) -> Self {
        Self::PersistenceError {
            reason: reason.into(),
            source: None,
        }
    }
}

impl From<NameRejection> for HillError {
    fn from(rejection: NameRejection) -> Self {
        Self::InvalidName { rejection }
    }
}
