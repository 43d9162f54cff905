use thiserror::Error;
use tracksim_core::TrajectoryError;

/// Errors that can occur while generating a trajectory.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("step {step}: every one of {attempts} candidates was rejected")]
    RejectionSamplingExhausted { step: usize, attempts: usize },

    #[error("stopped by observer at step {step}")]
    Stopped { step: usize },

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}
