//! View error types
//!
//! Errors are `Clone` because a materialization result is shared by every
//! caller waiting on the same memoized future.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("View already registered: {0}")]
    DuplicateId(String),

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("View {view_id} failed to produce {what}: {reason}")]
    Producer {
        view_id: String,
        what: &'static str,
        reason: String,
    },
}

impl ViewError {
    pub fn producer(view_id: impl Into<String>, what: &'static str, reason: impl ToString) -> Self {
        ViewError::Producer {
            view_id: view_id.into(),
            what,
            reason: reason.to_string(),
        }
    }
}
