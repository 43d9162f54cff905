use tracksim_core::{Position, RandomSource};

use super::{Obstacle, ObstacleScene, SceneError};
use crate::params::{ParamError, non_negative, positive};

/// Populates a scene with random obstacles until it is dense enough.
///
/// Each obstacle gets a radius of `(mean + g·sd) / 2` for a standard normal
/// `g`, redrawn until positive, and a centre drawn uniformly in the domain
/// (x first, then y, then z). Candidates overlapping an existing obstacle
/// are redrawn unless overlap is allowed. Every loop is capped, and hitting a
/// cap yields [`SceneError::RejectionSamplingExhausted`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBuilder {
    size: Vec<f64>,
    diameter_mean: f64,
    diameter_sd: f64,
    allow_overlap: bool,
    max_radius_draws: usize,
    max_placement_attempts: usize,
    max_obstacles: usize,
    resolution: Option<usize>,
}

impl SceneBuilder {
    /// Creates a builder for a domain of `size` (meters per axis) with
    /// obstacle diameters drawn from `N(diameter_mean, diameter_sd²)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mean diameter is not finite and positive, the
    /// standard deviation is negative or non-finite, or `size` is invalid
    /// for an [`ObstacleScene`].
    pub fn new(size: &[f64], diameter_mean: f64, diameter_sd: f64) -> Result<Self, SceneError> {
        ObstacleScene::new(size)?;
        Ok(Self {
            size: size.to_vec(),
            diameter_mean: positive("diameter_mean", diameter_mean)?,
            diameter_sd: non_negative("diameter_sd", diameter_sd)?,
            allow_overlap: false,
            max_radius_draws: 1_000,
            max_placement_attempts: 10_000,
            max_obstacles: 100_000,
            resolution: None,
        })
    }

    /// Allows or forbids overlapping obstacles (forbidden by default).
    #[must_use]
    pub fn allow_overlap(mut self, allow: bool) -> Self {
        self.allow_overlap = allow;
        self
    }

    /// Sets the caps on radius draws per obstacle, placement attempts per
    /// obstacle, and the total number of obstacles.
    ///
    /// # Errors
    ///
    /// Returns an error if any cap is zero.
    pub fn with_limits(
        mut self,
        max_radius_draws: usize,
        max_placement_attempts: usize,
        max_obstacles: usize,
    ) -> Result<Self, ParamError> {
        if max_radius_draws == 0 || max_placement_attempts == 0 || max_obstacles == 0 {
            return Err(ParamError::new("limits", "must all be at least 1"));
        }
        self.max_radius_draws = max_radius_draws;
        self.max_placement_attempts = max_placement_attempts;
        self.max_obstacles = max_obstacles;
        Ok(self)
    }

    /// Overrides the lattice resolution of the non-interaction estimate.
    #[must_use]
    pub fn with_resolution(mut self, cells_per_axis: usize) -> Self {
        self.resolution = Some(cells_per_axis.max(1));
        self
    }

    #[must_use]
    pub fn diameter_mean(&self) -> f64 {
        self.diameter_mean
    }

    #[must_use]
    pub fn diameter_sd(&self) -> f64 {
        self.diameter_sd
    }

    /// Adds obstacles until the estimated probability that a disk of
    /// `test_radius` touches no obstacle is at most `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `test_radius` is negative, `target` is outside
    /// `[0, 1)`, or any sampling cap is hit before the target is reached.
    pub fn build(
        &self,
        test_radius: f64,
        target: f64,
        rng: &mut RandomSource,
    ) -> Result<ObstacleScene, SceneError> {
        let test_radius = non_negative("test_radius", test_radius)?;
        if !(0.0..1.0).contains(&target) {
            return Err(ParamError::new("target", "must lie in [0, 1)").into());
        }

        let mut scene = ObstacleScene::new(&self.size)?;
        let resolution = self
            .resolution
            .unwrap_or_else(|| ObstacleScene::default_resolution(scene.dimension()));

        let mut p = scene.estimate_prob_non_interaction_with(test_radius, resolution);
        while p > target {
            if scene.obstacles().len() >= self.max_obstacles {
                return Err(SceneError::RejectionSamplingExhausted {
                    what: "obstacle count",
                    attempts: self.max_obstacles,
                });
            }

            let obstacle = self.place(&scene, rng)?;
            scene.add_obstacle(obstacle)?;
            p = scene.estimate_prob_non_interaction_with(test_radius, resolution);

            tracing::trace!(obstacles = scene.obstacles().len(), p, "added obstacle");
        }

        tracing::debug!(
            obstacles = scene.obstacles().len(),
            p,
            excluded = scene.estimate_excluded_volume_fraction(),
            "scene complete"
        );
        Ok(scene)
    }

    /// Draws one obstacle that fits the scene's overlap policy.
    fn place(&self, scene: &ObstacleScene, rng: &mut RandomSource) -> Result<Obstacle, SceneError> {
        for _ in 0..self.max_placement_attempts {
            let radius = self.draw_radius(rng)?;

            let mut center = Position::zeros();
            for (axis, extent) in scene.size().iter().enumerate() {
                center[axis] = rng.uniform() * extent;
            }

            let obstacle = Obstacle::new(center, radius)?;
            if self.allow_overlap || !scene.obstacles().iter().any(|o| o.overlaps(&obstacle)) {
                return Ok(obstacle);
            }
        }

        Err(SceneError::RejectionSamplingExhausted {
            what: "obstacle placement",
            attempts: self.max_placement_attempts,
        })
    }

    /// Draws a positive radius from the diameter distribution.
    fn draw_radius(&self, rng: &mut RandomSource) -> Result<f64, SceneError> {
        for _ in 0..self.max_radius_draws {
            let radius = (self.diameter_mean + rng.gaussian() * self.diameter_sd) / 2.0;
            if radius > 0.0 {
                return Ok(radius);
            }
        }

        Err(SceneError::RejectionSamplingExhausted {
            what: "obstacle radius",
            attempts: self.max_radius_draws,
        })
    }
}
