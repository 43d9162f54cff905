use tracksim_core::Trajectory;

/// The size of a lag window, fixed or relative to the trajectory length.
///
/// Windows always resolve to a value in `[1, step_count]` (or 1 for a
/// trajectory with no steps), so a relative window on a short trajectory
/// still yields a usable lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LagWindow {
    /// Exactly this many frames.
    Fixed(usize),
    /// The number of positions divided by this value, rounded down.
    Fraction(usize),
}

impl LagWindow {
    /// Resolves the window against a trajectory.
    #[must_use]
    pub fn resolve(self, trajectory: &Trajectory) -> usize {
        let raw = match self {
            LagWindow::Fixed(lag) => lag,
            LagWindow::Fraction(divisor) => trajectory.len() / divisor.max(1),
        };
        raw.clamp(1, trajectory.step_count().max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tracksim_core::{Dimension, Position};

    fn trajectory(points: usize) -> Trajectory {
        let positions = (0..points).map(|i| Position::new(i as f64, 0.0, 0.0)).collect();
        Trajectory::new(Dimension::Two, positions, 1.0).expect("valid")
    }

    #[test]
    fn fraction_uses_point_count() {
        assert_eq!(LagWindow::Fraction(20).resolve(&trajectory(61)), 3);
        assert_eq!(LagWindow::Fraction(4).resolve(&trajectory(61)), 15);
    }

    #[test]
    fn clamps_to_at_least_one() {
        assert_eq!(LagWindow::Fraction(20).resolve(&trajectory(10)), 1);
        assert_eq!(LagWindow::Fixed(0).resolve(&trajectory(10)), 1);
        assert_eq!(LagWindow::Fraction(0).resolve(&trajectory(1)), 1);
    }

    #[test]
    fn clamps_to_step_count() {
        assert_eq!(LagWindow::Fixed(100).resolve(&trajectory(10)), 9);
        assert_eq!(LagWindow::Fraction(1).resolve(&trajectory(10)), 9);
    }
}
