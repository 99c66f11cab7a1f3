//! Error types for store actions.

use thiserror::Error;

/// Failures surfaced by store actions that cannot be applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The action requires state that has not been initialised yet.
    #[error("invalid store state: {action} requires {missing}")]
    InvalidState {
        /// Action that was rejected.
        action: &'static str,
        /// Field that must be populated first.
        missing: &'static str,
    },
}

/// Convenience alias for store action results.
pub type StoreResult<T> = Result<T, StoreError>;
