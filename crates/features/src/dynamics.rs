use std::f64::consts::PI;

use tracksim_core::{Dimension, FeatureValue, Position, Trajectory};

use crate::{
    Degenerate, FeatureExtractor, LagWindow,
    msd::{fit_linear_quadratic, linear_fit, msd_curve},
};

/// Curvature of the MSD curve.
///
/// Fits `MSD(τ) = a·τ + c·τ²` over lags `1..=M` (in frames) and reports the
/// dimensionless `c·M / a`: near zero for free diffusion, positive for
/// directed motion, and negative for confined motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsdCurvature {
    max_lag: LagWindow,
}

impl MsdCurvature {
    #[must_use]
    pub fn new(max_lag: LagWindow) -> Self {
        Self { max_lag }
    }
}

impl Default for MsdCurvature {
    /// Lags up to a quarter of the positions.
    fn default() -> Self {
        Self::new(LagWindow::Fraction(4))
    }
}

impl FeatureExtractor for MsdCurvature {
    fn name(&self) -> &str {
        "msd_curvature"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        if trajectory.step_count() < 2 {
            return Err(Degenerate::new("fewer than two lags"));
        }
        let max_lag = self.max_lag.resolve(trajectory).max(2);

        let curve = msd_curve(trajectory.positions(), 1..=max_lag)
            .ok_or(Degenerate::new("lag window exceeds trajectory"))?;
        let (lags, values): (Vec<f64>, Vec<f64>) =
            curve.into_iter().map(|(lag, value)| (lag as f64, value)).unzip();

        let (a, c) = fit_linear_quadratic(&lags, &values)
            .ok_or(Degenerate::new("singular MSD fit"))?;
        if a == 0.0 {
            return Err(Degenerate::new("MSD has no linear term"));
        }
        Ok(FeatureValue::Scalar(c * max_lag as f64 / a))
    }
}

/// Power-law fit `MSD(t) = 2·d·D·t^α` over a bounded lag range.
///
/// Produces the sequence `[α, D]`, with `t` in seconds, `D` in m²/s, and `d`
/// the trajectory's dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerLaw {
    min_lag: usize,
    max_lag: LagWindow,
}

impl PowerLaw {
    /// Creates a fit over lags `min_lag..=max_lag`.
    ///
    /// The window is widened to at least two lags when the trajectory
    /// allows it.
    #[must_use]
    pub fn new(min_lag: usize, max_lag: LagWindow) -> Self {
        Self {
            min_lag: min_lag.max(1),
            max_lag,
        }
    }
}

impl FeatureExtractor for PowerLaw {
    fn name(&self) -> &str {
        "power_law"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let max_lag = self
            .max_lag
            .resolve(trajectory)
            .max(self.min_lag + 1)
            .min(trajectory.step_count());
        if max_lag <= self.min_lag {
            return Err(Degenerate::new("fewer than two lags"));
        }

        let curve = msd_curve(trajectory.positions(), self.min_lag..=max_lag)
            .ok_or(Degenerate::new("lag window exceeds trajectory"))?;
        if curve.iter().any(|(_, value)| *value <= 0.0) {
            return Err(Degenerate::new("non-positive MSD"));
        }

        let dt = trajectory.frame_interval();
        let (log_t, log_msd): (Vec<f64>, Vec<f64>) = curve
            .into_iter()
            .map(|(lag, value)| ((lag as f64 * dt).ln(), value.ln()))
            .unzip();

        let (alpha, intercept) =
            linear_fit(&log_t, &log_msd).ok_or(Degenerate::new("singular power-law fit"))?;
        let d = trajectory.dimension().get() as f64;
        let coefficient = intercept.exp() / (2.0 * d);

        Ok(FeatureValue::Sequence(vec![alpha, coefficient]))
    }
}

/// Sample standard deviation of turning angles, in radians.
///
/// The trajectory is cut into consecutive non-overlapping displacements of
/// `lag` frames, and the angle between each displacement and the next is
/// measured: signed in 1-D and 2-D, unsigned in 3-D. Zero-length
/// displacements are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionStd {
    lag: LagWindow,
}

impl DirectionStd {
    #[must_use]
    pub fn new(lag: LagWindow) -> Self {
        Self { lag }
    }
}

impl FeatureExtractor for DirectionStd {
    fn name(&self) -> &str {
        "direction_std"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let lag = self.lag.resolve(trajectory);
        let displacements: Vec<Position> = trajectory
            .positions()
            .iter()
            .step_by(lag)
            .collect::<Vec<_>>()
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|v| v.norm_squared() > 0.0)
            .collect();

        let planar = trajectory.dimension() != Dimension::Three;
        let angles: Vec<f64> = displacements
            .windows(2)
            .map(|w| turning_angle(&w[0], &w[1], planar))
            .collect();
        if angles.len() < 2 {
            return Err(Degenerate::new("fewer than two turning angles"));
        }

        let n = angles.len() as f64;
        let mean = angles.iter().sum::<f64>() / n;
        let variance = angles.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Ok(FeatureValue::Scalar(variance.sqrt()))
    }
}

fn turning_angle(a: &Position, b: &Position, planar: bool) -> f64 {
    if planar {
        let cross = a.x * b.y - a.y * b.x;
        let angle = cross.atan2(a.dot(b));
        // atan2 yields -π for anti-parallel 1-D steps with a signed zero.
        if angle <= -PI { PI } else { angle }
    } else {
        (a.dot(b) / (a.norm() * b.norm())).clamp(-1.0, 1.0).acos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn trajectory(dimension: Dimension, positions: Vec<Position>, dt: f64) -> Trajectory {
        Trajectory::new(dimension, positions, dt).expect("valid")
    }

    fn ballistic(n: usize, speed: f64) -> Trajectory {
        let positions = (0..n).map(|i| Position::new(i as f64 * speed, 0.0, 0.0)).collect();
        trajectory(Dimension::Two, positions, 1.0)
    }

    /// Alternating unit steps along x and y.
    fn staircase(n: usize) -> Trajectory {
        let mut positions = vec![Position::zeros()];
        for i in 1..n {
            let mut next = positions[i - 1];
            if i % 2 == 1 {
                next.x += 1.0;
            } else {
                next.y += 1.0;
            }
            positions.push(next);
        }
        trajectory(Dimension::Two, positions, 0.5)
    }

    #[test]
    fn directed_motion_has_positive_curvature() {
        // Steady drift with a one-frame jitter: MSD ≈ τ² plus 1 on odd lags.
        let positions = (0..41)
            .map(|i| Position::new(i as f64 + if i % 2 == 0 { 0.0 } else { 1.0 }, 0.0, 0.0))
            .collect();
        let t = trajectory(Dimension::One, positions, 1.0);

        let value = MsdCurvature::new(LagWindow::Fixed(10))
            .extract(&t)
            .expect("defined")
            .as_scalar()
            .expect("scalar");
        assert!(value > 0.0, "curvature = {value}");
    }

    #[test]
    fn oscillating_motion_has_negative_curvature() {
        let positions = (0..41)
            .map(|i| Position::new(if i % 2 == 0 { 0.0 } else { 1.0 }, 0.0, 0.0))
            .collect();
        let t = trajectory(Dimension::One, positions, 1.0);

        let value = MsdCurvature::new(LagWindow::Fixed(4))
            .extract(&t)
            .expect("defined")
            .as_scalar()
            .expect("scalar");
        assert!(value < 0.0, "curvature = {value}");
    }

    #[test]
    fn curvature_needs_two_lags() {
        assert!(MsdCurvature::default().extract(&ballistic(2, 1.0)).is_err());

        let positions = [0.0, 1.0, 3.0].iter().map(|x| Position::new(*x, 0.0, 0.0)).collect();
        let short = trajectory(Dimension::One, positions, 1.0);
        assert!(MsdCurvature::default().extract(&short).is_ok());
    }

    #[test]
    fn power_law_of_ballistic_motion() {
        // MSD(t) = v²·t², so α = 2 and 2·d·D = v².
        let t = ballistic(61, 3.0);
        let value = PowerLaw::new(1, LagWindow::Fixed(10)).extract(&t).expect("defined");
        let fit = value.as_sequence().expect("sequence");

        assert_relative_eq!(fit[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(fit[1], 9.0 / 4.0, max_relative = 1e-9);
    }

    #[test]
    fn staircase_is_superdiffusive() {
        // Even lags have MSD = τ²/2 and odd lags (τ² + 1)/2.
        let value = PowerLaw::new(1, LagWindow::Fixed(8))
            .extract(&staircase(61))
            .expect("defined");
        let alpha = value.as_sequence().expect("sequence")[0];
        assert!((1.0..=2.0).contains(&alpha), "alpha = {alpha}");
    }

    #[test]
    fn power_law_widens_single_lag_window() {
        let fit = PowerLaw::new(1, LagWindow::Fraction(20))
            .extract(&ballistic(10, 1.0))
            .expect("widened to two lags");
        assert_relative_eq!(fit.as_sequence().expect("sequence")[0], 2.0, epsilon = 1e-9);

        assert!(PowerLaw::new(1, LagWindow::Fixed(5)).extract(&ballistic(2, 1.0)).is_err());
    }

    #[test]
    fn power_law_rejects_stationary_trajectory() {
        let t = trajectory(Dimension::Two, vec![Position::zeros(); 10], 1.0);
        assert!(PowerLaw::new(1, LagWindow::Fixed(3)).extract(&t).is_err());
    }

    #[test]
    fn straight_line_has_no_direction_spread() {
        let value = DirectionStd::new(LagWindow::Fixed(2))
            .extract(&ballistic(21, 1.0))
            .expect("defined")
            .as_scalar()
            .expect("scalar");
        assert_relative_eq!(value, 0.0);
    }

    #[test]
    fn alternating_turns_have_known_spread() {
        // Left and right quarter turns: angles ±π/2.
        let t = staircase(6);
        let value = DirectionStd::new(LagWindow::Fixed(1))
            .extract(&t)
            .expect("defined")
            .as_scalar()
            .expect("scalar");

        // Angles π/2, −π/2, π/2, −π/2: mean 0, sample variance 4·(π/2)²/3.
        assert_relative_eq!(value, (PI * PI / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn one_dimensional_reversals_are_half_turns() {
        let positions = [0.0, 1.0, 0.0, 1.0, 2.0]
            .iter()
            .map(|x| Position::new(*x, 0.0, 0.0))
            .collect();
        let t = trajectory(Dimension::One, positions, 1.0);

        // Angles π, π, 0.
        let value = DirectionStd::new(LagWindow::Fixed(1))
            .extract(&t)
            .expect("defined")
            .as_scalar()
            .expect("scalar");
        assert_relative_eq!(value, PI / 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn direction_spread_needs_two_angles() {
        assert!(DirectionStd::new(LagWindow::Fixed(1)).extract(&ballistic(3, 1.0)).is_err());
        assert!(DirectionStd::new(LagWindow::Fixed(1)).extract(&ballistic(1, 1.0)).is_err());
    }
}
