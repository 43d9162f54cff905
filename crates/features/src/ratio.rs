use tracksim_core::{FeatureValue, Position, Trajectory};

use crate::{
    Degenerate, FeatureExtractor,
    msd::{fit_through_origin, linear_fit, msd_curve},
};

/// Short-time over long-time diffusion coefficient.
///
/// Each coefficient comes from a line through the origin fitted to
/// `MSD(τ) = 2·d·D·τ·Δt`: the short one over lags `1..=n`, the long one over
/// the last `n` lags ending at half the step count. `n` is clamped to that
/// half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortLongDRatio {
    points: usize,
}

impl ShortLongDRatio {
    #[must_use]
    pub fn new(points: usize) -> Self {
        Self { points }
    }
}

impl FeatureExtractor for ShortLongDRatio {
    fn name(&self) -> &str {
        "short_long_d_ratio"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let (short, long) = windows(trajectory, self.points.max(1))?;
        let scale = 2.0 * trajectory.dimension().get() as f64 * trajectory.frame_interval();

        let short_d = diffusion_coefficient(trajectory.positions(), short, scale)?;
        let long_d = diffusion_coefficient(trajectory.positions(), long, scale)?;
        if long_d == 0.0 {
            return Err(Degenerate::new("long-time diffusion coefficient is zero"));
        }
        Ok(FeatureValue::Scalar(short_d / long_d))
    }
}

/// Short-time over long-time log–log MSD slope.
///
/// Uses the same windows as [`ShortLongDRatio`], with at least two lags per
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortLongMsdRatio {
    points: usize,
}

impl ShortLongMsdRatio {
    #[must_use]
    pub fn new(points: usize) -> Self {
        Self { points }
    }
}

impl FeatureExtractor for ShortLongMsdRatio {
    fn name(&self) -> &str {
        "short_long_msd_ratio"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let (short, long) = windows(trajectory, self.points.max(2))?;
        if short.clone().count() < 2 {
            return Err(Degenerate::new("fewer than two lags per window"));
        }

        let short_slope = log_slope(trajectory.positions(), short)?;
        let long_slope = log_slope(trajectory.positions(), long)?;
        if long_slope == 0.0 {
            return Err(Degenerate::new("long-time MSD is flat"));
        }
        Ok(FeatureValue::Scalar(short_slope / long_slope))
    }
}

type LagRange = std::ops::RangeInclusive<usize>;

/// Returns the short and long lag windows for `points` lags each.
fn windows(trajectory: &Trajectory, points: usize) -> Result<(LagRange, LagRange), Degenerate> {
    let long_end = trajectory.step_count() / 2;
    if long_end == 0 {
        return Err(Degenerate::new("fewer than two steps"));
    }
    let n = points.min(long_end);
    Ok((1..=n, long_end + 1 - n..=long_end))
}

fn diffusion_coefficient(positions: &[Position], lags: LagRange, scale: f64) -> Result<f64, Degenerate> {
    let curve = msd_curve(positions, lags).ok_or(Degenerate::new("lag window exceeds trajectory"))?;
    let (lags, values): (Vec<f64>, Vec<f64>) =
        curve.into_iter().map(|(lag, value)| (lag as f64, value)).unzip();

    let slope = fit_through_origin(&lags, &values).ok_or(Degenerate::new("empty lag window"))?;
    Ok(slope / scale)
}

fn log_slope(positions: &[Position], lags: LagRange) -> Result<f64, Degenerate> {
    let curve = msd_curve(positions, lags).ok_or(Degenerate::new("lag window exceeds trajectory"))?;
    if curve.iter().any(|(_, value)| *value <= 0.0) {
        return Err(Degenerate::new("non-positive MSD"));
    }
    let (log_lag, log_msd): (Vec<f64>, Vec<f64>) = curve
        .into_iter()
        .map(|(lag, value)| ((lag as f64).ln(), value.ln()))
        .unzip();

    linear_fit(&log_lag, &log_msd)
        .map(|(slope, _)| slope)
        .ok_or(Degenerate::new("singular slope fit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use tracksim_core::Dimension;

    fn one_d(xs: &[f64]) -> Trajectory {
        let positions = xs.iter().map(|x| Position::new(*x, 0.0, 0.0)).collect();
        Trajectory::new(Dimension::One, positions, 0.1).expect("valid")
    }

    fn ballistic(n: usize) -> Trajectory {
        one_d(&(0..n).map(|i| i as f64).collect::<Vec<_>>())
    }

    #[test]
    fn windows_clamp_to_half_the_steps() {
        let t = ballistic(61);
        assert_eq!(windows(&t, 3), Ok((1..=3, 28..=30)));

        let short = ballistic(5);
        assert_eq!(windows(&short, 3), Ok((1..=2, 1..=2)));

        assert!(windows(&ballistic(2), 3).is_err());
    }

    #[test]
    fn ballistic_d_grows_with_lag() {
        // MSD = τ², so the through-origin slope is Στ³/Στ² on each window.
        let value = ShortLongDRatio::new(3)
            .extract(&ballistic(61))
            .expect("defined")
            .as_scalar()
            .expect("scalar");

        let short = 36.0 / 14.0;
        let long = (28f64.powi(3) + 29f64.powi(3) + 30f64.powi(3))
            / (28f64.powi(2) + 29f64.powi(2) + 30f64.powi(2));
        assert_relative_eq!(value, short / long, max_relative = 1e-12);
    }

    #[test]
    fn ballistic_msd_slopes_match() {
        let value = ShortLongMsdRatio::new(3)
            .extract(&ballistic(61))
            .expect("defined")
            .as_scalar()
            .expect("scalar");
        assert_relative_eq!(value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn identical_windows_give_unit_ratio() {
        let t = one_d(&[0.0, 1.0, 3.0, 2.0, 5.0]);
        let d = ShortLongDRatio::new(10).extract(&t).expect("defined");
        let msd = ShortLongMsdRatio::new(10).extract(&t).expect("defined");

        assert_relative_eq!(d.as_scalar().expect("scalar"), 1.0);
        assert_relative_eq!(msd.as_scalar().expect("scalar"), 1.0);
    }

    #[test]
    fn short_or_still_trajectories_are_degenerate() {
        assert!(ShortLongDRatio::new(3).extract(&ballistic(2)).is_err());
        assert!(ShortLongMsdRatio::new(3).extract(&ballistic(4)).is_err());

        let still = one_d(&[1.0; 20]);
        assert!(ShortLongDRatio::new(3).extract(&still).is_err());
        assert!(ShortLongMsdRatio::new(3).extract(&still).is_err());
    }
}
