use tracksim_core::Position;

use crate::params::{ParamError, positive};

/// An immobile disk (or sphere) that diffusing particles cannot enter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    center: Position,
    radius: f64,
}

impl Obstacle {
    /// Creates an obstacle at `center` with `radius` in meters.
    ///
    /// # Errors
    ///
    /// Returns an error if the centre is non-finite or the radius is not
    /// finite and positive.
    pub fn new(center: Position, radius: f64) -> Result<Self, ParamError> {
        if !center.iter().all(|c| c.is_finite()) {
            return Err(ParamError::new("center", "must be finite"));
        }
        let radius = positive("radius", radius)?;
        Ok(Self { center, radius })
    }

    #[must_use]
    pub fn center(&self) -> &Position {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns true if `position` lies strictly inside the obstacle.
    #[must_use]
    pub fn contains(&self, position: &Position) -> bool {
        (position - self.center).norm_squared() < self.radius * self.radius
    }

    /// Returns true if the two obstacles share interior points.
    #[must_use]
    pub fn overlaps(&self, other: &Obstacle) -> bool {
        let reach = self.radius + other.radius;
        (self.center - other.center).norm_squared() < reach * reach
    }
}
