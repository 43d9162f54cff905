//! Obstacle scenes for hindered (anomalous) diffusion.
//!
//! An [`ObstacleScene`] is a box `[0, size₀] × … × [0, size_D)` populated with
//! immobile disks (or spheres). Scenes are built incrementally, usually by a
//! [`SceneBuilder`], until a particle is unlikely to diffuse for the target
//! duration without meeting an obstacle, and then borrowed read-only by
//! [`AnomalousDiffusion`].
//!
//! [`AnomalousDiffusion`]: crate::AnomalousDiffusion

mod builder;
mod error;
mod grid;
mod obstacle;
mod start;

pub use builder::SceneBuilder;
pub use error::SceneError;
pub use obstacle::Obstacle;
pub use start::sample_start_position;

use std::f64::consts::PI;

use tracksim_core::{Dimension, Position};

use crate::params::{ParamError, positive};

/// A rectangular domain holding non-moving obstacles.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleScene {
    dimension: Dimension,
    size: Position,
    obstacles: Vec<Obstacle>,
}

impl ObstacleScene {
    /// Creates an empty scene with the given extent per axis, in meters.
    ///
    /// The number of entries in `size` sets the scene's dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` does not have 1 to 3 entries or any extent
    /// is not finite and positive.
    pub fn new(size: &[f64]) -> Result<Self, SceneError> {
        let dimension = Dimension::try_from(size.len())
            .map_err(|_| ParamError::new("size", "must have 1, 2, or 3 entries"))?;

        let mut extent = Position::zeros();
        for (axis, value) in size.iter().enumerate() {
            extent[axis] = positive("size", *value)?;
        }

        Ok(Self {
            dimension,
            size: extent,
            obstacles: Vec::new(),
        })
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Returns the extent of each active axis.
    #[must_use]
    pub fn size(&self) -> &[f64] {
        &self.size.as_slice()[..self.dimension.get()]
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Appends an obstacle.
    ///
    /// Overlap with existing obstacles is not checked; keeping obstacles
    /// disjoint is up to the caller (see [`SceneBuilder`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the obstacle's centre has a component beyond the
    /// scene's dimension.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> Result<(), SceneError> {
        let active = self.dimension.get();
        if obstacle.center().iter().skip(active).any(|c| *c != 0.0) {
            return Err(SceneError::DimensionMismatch { expected: active });
        }
        self.obstacles.push(obstacle);
        Ok(())
    }

    /// Returns true if `position` lies within the domain, boundaries included.
    #[must_use]
    pub fn contains(&self, position: &Position) -> bool {
        let active = self.dimension.get();
        (0..active).all(|axis| (0.0..=self.size[axis]).contains(&position[axis]))
            && position.iter().skip(active).all(|c| *c == 0.0)
    }

    /// Returns true if `position` is outside the domain or strictly inside any
    /// obstacle.
    #[must_use]
    pub fn check_collision(&self, position: &Position) -> bool {
        !self.contains(position) || self.obstacles.iter().any(|o| o.contains(position))
    }

    /// Returns the length, area, or volume of the domain.
    #[must_use]
    pub fn measure(&self) -> f64 {
        self.size().iter().product()
    }

    /// Returns the summed obstacle measure divided by the domain measure.
    ///
    /// Overlapping obstacles and the parts of obstacles outside the domain
    /// are counted in full.
    #[must_use]
    pub fn estimate_excluded_volume_fraction(&self) -> f64 {
        let occupied: f64 = self
            .obstacles
            .iter()
            .map(|o| ball_measure(self.dimension, o.radius()))
            .sum();
        occupied / self.measure()
    }

    /// Estimates the probability that a disk of `test_radius`, centred at a
    /// uniformly random point of the domain, touches no obstacle.
    ///
    /// The estimate counts the lattice cells whose centres are at least
    /// `obstacle.radius + test_radius` from every obstacle, using the default
    /// resolution for the scene's dimension (see
    /// [`ObstacleScene::default_resolution`]). It is deterministic and draws
    /// no random numbers.
    #[must_use]
    pub fn estimate_prob_non_interaction(&self, test_radius: f64) -> f64 {
        self.estimate_prob_non_interaction_with(test_radius, Self::default_resolution(self.dimension))
    }

    /// Like [`ObstacleScene::estimate_prob_non_interaction`], with
    /// `cells_per_axis` lattice cells along each active axis.
    #[must_use]
    pub fn estimate_prob_non_interaction_with(&self, test_radius: f64, cells_per_axis: usize) -> f64 {
        grid::non_interaction_fraction(self, test_radius.max(0.0), cells_per_axis.max(1))
    }

    /// Returns the lattice resolution used by
    /// [`ObstacleScene::estimate_prob_non_interaction`].
    #[must_use]
    pub fn default_resolution(dimension: Dimension) -> usize {
        match dimension {
            Dimension::One => 4096,
            Dimension::Two => 256,
            Dimension::Three => 64,
        }
    }
}

/// Length, area, or volume of a ball of `radius`.
fn ball_measure(dimension: Dimension, radius: f64) -> f64 {
    match dimension {
        Dimension::One => 2.0 * radius,
        Dimension::Two => PI * radius * radius,
        Dimension::Three => 4.0 / 3.0 * PI * radius.powi(3),
    }
}
