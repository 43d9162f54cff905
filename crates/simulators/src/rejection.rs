use crate::params::ParamError;

/// What a rejection-sampled step does once every attempt has been rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exhaustion {
    /// Keep the current position for this step.
    ///
    /// The current position is always acceptable, so this is the
    /// zero-magnitude candidate and the run continues.
    #[default]
    StayPut,
    /// Abort with [`SimulationError::RejectionSamplingExhausted`].
    ///
    /// [`SimulationError::RejectionSamplingExhausted`]: crate::SimulationError::RejectionSamplingExhausted
    Fail,
}

/// Bounds for per-step rejection sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectionConfig {
    max_attempts: usize,
    on_exhausted: Exhaustion,
}

impl Default for RejectionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10_000,
            on_exhausted: Exhaustion::StayPut,
        }
    }
}

impl RejectionConfig {
    /// Creates a config allowing `max_attempts` candidates per step.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_attempts` is zero.
    pub fn new(max_attempts: usize, on_exhausted: Exhaustion) -> Result<Self, ParamError> {
        if max_attempts == 0 {
            return Err(ParamError::new("max_attempts", "must be at least 1"));
        }
        Ok(Self {
            max_attempts,
            on_exhausted,
        })
    }

    /// Returns the maximum number of candidates drawn per step.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn on_exhausted(&self) -> Exhaustion {
        self.on_exhausted
    }
}
