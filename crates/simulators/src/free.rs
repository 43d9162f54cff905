use tracksim_core::{Dimension, Observer, Position, RandomSource, Trajectory};

use crate::{
    Action, DiffusionParams, Event, RejectionConfig, SimulationError, Simulator, walk::walk,
};

/// Unconstrained Brownian motion starting at the origin.
///
/// Each step is an independent isotropic Gaussian displacement with per-axis
/// standard deviation `√(2·D·Δt)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeDiffusion {
    params: DiffusionParams,
}

impl FreeDiffusion {
    #[must_use]
    pub fn new(params: DiffusionParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &DiffusionParams {
        &self.params
    }
}

impl Simulator for FreeDiffusion {
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
        walk(
            &self.params,
            Position::zeros(),
            &RejectionConfig::default(),
            rng,
            observer,
            |_| true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn starts_at_origin_with_requested_length() {
        let params = DiffusionParams::new(9.02e-14, 1.0 / 30.0, Dimension::Two, 60).expect("valid");
        let mut rng = RandomSource::from_seed(22);

        let t = FreeDiffusion::new(params).simulate(&mut rng).expect("free diffusion");

        assert_eq!(t.len(), 61);
        assert_eq!(t.step_count(), 60);
        assert_eq!(t.positions()[0], Position::zeros());
        assert_relative_eq!(t.frame_interval(), 1.0 / 30.0);
    }

    #[test]
    fn step_variance_matches_two_d_dt() {
        let d = 9.02e-14;
        let dt = 1.0 / 30.0;
        let params = DiffusionParams::new(d, dt, Dimension::Two, 100).expect("valid");
        let sim = FreeDiffusion::new(params);
        let mut rng = RandomSource::from_seed(1);

        let mut sum = [0.0; 2];
        let mut sum_sq = [0.0; 2];
        let mut n = 0.0;
        for _ in 0..200 {
            let t = sim.simulate(&mut rng).expect("free diffusion");
            for step in t.steps() {
                for axis in 0..2 {
                    sum[axis] += step[axis];
                    sum_sq[axis] += step[axis] * step[axis];
                }
                n += 1.0;
            }
        }

        let expected = 2.0 * d * dt;
        for axis in 0..2 {
            let mean = sum[axis] / n;
            let variance = sum_sq[axis] / n - mean * mean;
            assert_relative_eq!(variance, expected, max_relative = 0.05);
        }
    }

    #[test]
    fn one_dimensional_walk_stays_on_the_x_axis() {
        let params = DiffusionParams::new(1.0, 1.0, Dimension::One, 50).expect("valid");
        let mut rng = RandomSource::from_seed(3);

        let t = FreeDiffusion::new(params).simulate(&mut rng).expect("free diffusion");

        assert!(t.positions().iter().all(|p| p.y == 0.0 && p.z == 0.0));
    }

    #[test]
    fn same_seed_reproduces_trajectory() {
        let params = DiffusionParams::new(1.0, 0.1, Dimension::Three, 30).expect("valid");
        let sim = FreeDiffusion::new(params);

        let a = sim.simulate(&mut RandomSource::from_seed(42)).expect("free");
        let b = sim.simulate(&mut RandomSource::from_seed(42)).expect("free");

        assert_eq!(a, b);
    }
}
