use tracksim_core::{Dimension, Observer, Position, RandomSource, Trajectory};

use crate::{
    Action, DiffusionParams, Event, ParamError, RejectionConfig, SimulationError, Simulator,
    params::positive, walk::walk,
};

/// Brownian motion confined to a disk (or sphere) around the origin.
///
/// Steps whose destination lies farther than the confinement radius from the
/// origin are rejected and re-sampled. See [`interaction_radius`] for the
/// usual way of choosing the radius for a given track duration.
///
/// [`interaction_radius`]: crate::interaction_radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfinedDiffusion {
    params: DiffusionParams,
    radius: f64,
    rejection: RejectionConfig,
}

impl ConfinedDiffusion {
    /// Creates a confined simulator with the default [`RejectionConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not finite and positive.
    pub fn new(params: DiffusionParams, radius: f64) -> Result<Self, ParamError> {
        let radius = positive("radius", radius)?;
        Ok(Self {
            params,
            radius,
            rejection: RejectionConfig::default(),
        })
    }

    /// Replaces the rejection-sampling bounds.
    #[must_use]
    pub fn with_rejection(mut self, rejection: RejectionConfig) -> Self {
        self.rejection = rejection;
        self
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn params(&self) -> &DiffusionParams {
        &self.params
    }
}

impl Simulator for ConfinedDiffusion {
    fn dimension(&self) -> Dimension {
        self.params.dimension()
    }

    fn steps(&self) -> usize {
        self.params.steps()
    }

    fn simulate_observed<Obs>(
        &self,
        rng: &mut RandomSource,
        observer: Obs,
    ) -> Result<Trajectory, SimulationError>
    where
        Obs: Observer<Event, Action>,
    {
        let radius = self.radius;
        walk(
            &self.params,
            Position::zeros(),
            &self.rejection,
            rng,
            observer,
            |p| p.norm() <= radius,
        )
    }
}
