//! Trajectory simulators for distinct diffusion regimes.
//!
//! Each simulator produces one [`Trajectory`] from validated parameters and an
//! explicitly passed [`RandomSource`]:
//!
//! - [`FreeDiffusion`]: isotropic Gaussian steps from the origin
//! - [`ConfinedDiffusion`]: free steps rejected outside a sphere around the
//!   origin
//! - [`AnomalousDiffusion`]: free steps rejected when they hit an obstacle
//!   of an [`ObstacleScene`] or leave its domain
//! - [`ActiveTransport`]: deterministic drift with a rotating heading, meant
//!   to be superimposed with [`combine`]
//!
//! # Observer Events
//!
//! Every simulator emits one [`Event`] per accepted step. Observers can
//! return [`Action::StopEarly`] to abort the run, which yields
//! [`SimulationError::Stopped`] since a truncated trajectory would violate
//! the requested step count.
//!
//! # Rejection sampling
//!
//! Confined and anomalous steps are re-sampled until accepted, at most
//! [`RejectionConfig::max_attempts`] times per step. What happens after that
//! is controlled by [`Exhaustion`].

mod active;
mod anomalous;
mod calibration;
mod combine;
mod confined;
mod error;
mod event;
mod free;
mod params;
mod rejection;
mod walk;

pub mod scene;

pub use active::ActiveTransport;
pub use anomalous::AnomalousDiffusion;
pub use calibration::interaction_radius;
pub use combine::{CombineError, combine};
pub use confined::ConfinedDiffusion;
pub use error::SimulationError;
pub use event::{Action, Event};
pub use free::FreeDiffusion;
pub use params::{DiffusionParams, ParamError};
pub use rejection::{Exhaustion, RejectionConfig};
pub use scene::{Obstacle, ObstacleScene, SceneBuilder, SceneError, sample_start_position};

use tracksim_core::{Dimension, Observer, RandomSource, Trajectory};

/// A stochastic process that generates one trajectory per call.
pub trait Simulator {
    /// Returns the dimension of generated trajectories.
    fn dimension(&self) -> Dimension;

    /// Returns the number of steps in generated trajectories.
    fn steps(&self) -> usize;

    /// Generates a trajectory, reporting each accepted step to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if rejection sampling is exhausted under
    /// [`Exhaustion::Fail`] or the observer stops the run.
    fn simulate_observed<Obs>(
        &self,
        rng: &mut RandomSource,
        observer: Obs,
    ) -> Result<Trajectory, SimulationError>
    where
        Obs: Observer<Event, Action>;

    /// Generates a trajectory without observation.
    ///
    /// # Errors
    ///
    /// Returns an error if rejection sampling is exhausted under
    /// [`Exhaustion::Fail`].
    fn simulate(&self, rng: &mut RandomSource) -> Result<Trajectory, SimulationError> {
        self.simulate_observed(rng, ())
    }
}
