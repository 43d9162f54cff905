use thiserror::Error;

/// A feature could not be computed for the given trajectory.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("degenerate input: {reason}")]
pub struct Degenerate {
    reason: &'static str,
}

impl Degenerate {
    #[must_use]
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}
