use thiserror::Error;

/// Errors surfaced by the drill controller.
///
/// Only configuration problems are reported, and only when a session is
/// started. Out-of-order calls on a running or finished session are no-ops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrillError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
}

impl DrillError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DrillError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
