//! Descriptors relative to a smoothing spline through the trajectory.
//!
//! A least-squares cubic B-spline with a small number of uniform segments
//! approximates the underlying path. Each position is then projected onto a
//! dense polyline sampled from that spline, splitting its motion into a
//! component along the curve (arc length) and one across it (offset).

mod fit;

use tracksim_core::{FeatureValue, Position, Trajectory};

use crate::{
    Degenerate, FeatureExtractor,
    msd::{msd, msd_scalar},
};

use fit::{BSpline, Projection, parameter, project};

/// Fewest positions a spline descriptor is computed for.
const MIN_POSITIONS: usize = 5;

/// Motion along versus across the fitted spline at a fixed lag.
///
/// Produces `[msd∥ / msd⊥, msd∥, msd⊥]`, where `msd∥` is the MSD of the
/// arc-length coordinate and `msd⊥` the MSD of the perpendicular offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplineDynamics {
    segments: usize,
    lag: usize,
}

impl SplineDynamics {
    /// Fits `segments` spline spans and compares displacements at `lag`
    /// frames.
    #[must_use]
    pub fn new(segments: usize, lag: usize) -> Self {
        Self {
            segments: segments.max(1),
            lag: lag.max(1),
        }
    }
}

impl FeatureExtractor for SplineDynamics {
    fn name(&self) -> &str {
        "spline_dynamics"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let (_, projections) = fit_and_project(trajectory, self.segments)?;

        let along: Vec<f64> = projections.iter().map(|p| p.arc_length).collect();
        let across: Vec<Position> = projections.iter().map(|p| p.offset).collect();

        let parallel = msd_scalar(&along, self.lag).ok_or(Degenerate::new("lag exceeds trajectory"))?;
        let perpendicular = msd(&across, self.lag).ok_or(Degenerate::new("lag exceeds trajectory"))?;
        if perpendicular <= parallel * f64::EPSILON {
            return Err(Degenerate::new("no motion across the spline"));
        }

        Ok(FeatureValue::Sequence(vec![
            parallel / perpendicular,
            parallel,
            perpendicular,
        ]))
    }
}

/// Shape of the fitted spline and the scatter around it.
///
/// Produces `[mean |κ|, rms offset]`: the curvature averaged over the
/// positions' spline parameters, and the root-mean-square distance of the
/// positions from the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplineSpatial {
    segments: usize,
}

impl SplineSpatial {
    #[must_use]
    pub fn new(segments: usize) -> Self {
        Self {
            segments: segments.max(1),
        }
    }
}

impl FeatureExtractor for SplineSpatial {
    fn name(&self) -> &str {
        "spline_spatial"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let (spline, projections) = fit_and_project(trajectory, self.segments)?;
        let velocity = spline.derivative();
        let acceleration = velocity.derivative();

        let n = trajectory.len();
        let curvatures: Vec<f64> = (0..n)
            .filter_map(|i| {
                let t = parameter(i, n);
                curvature(&velocity.evaluate(t), &acceleration.evaluate(t))
            })
            .collect();
        if curvatures.is_empty() {
            return Err(Degenerate::new("spline has zero speed everywhere"));
        }
        let mean_curvature = curvatures.iter().sum::<f64>() / curvatures.len() as f64;

        let mean_square = projections.iter().map(|p| p.offset.norm_squared()).sum::<f64>()
            / projections.len() as f64;

        Ok(FeatureValue::Sequence(vec![mean_curvature, mean_square.sqrt()]))
    }
}

/// Unsigned curvature `|r′ × r″| / |r′|³`, or `None` where the speed is zero.
fn curvature(velocity: &Position, acceleration: &Position) -> Option<f64> {
    let speed_sq = velocity.norm_squared();
    if speed_sq == 0.0 {
        return None;
    }
    let cross_sq = speed_sq * acceleration.norm_squared() - velocity.dot(acceleration).powi(2);
    Some(cross_sq.max(0.0).sqrt() / speed_sq.powf(1.5))
}

/// Fits the spline and projects every position onto a dense sampling of it.
fn fit_and_project(
    trajectory: &Trajectory,
    segments: usize,
) -> Result<(BSpline, Vec<Projection>), Degenerate> {
    let positions = trajectory.positions();
    let n = positions.len();
    if n < MIN_POSITIONS {
        return Err(Degenerate::new("too few positions for a spline"));
    }

    // At least two positions per span keeps the normal equations regular.
    let segments = segments.min((n - 1) / 2).max(1);
    let spline = BSpline::fit(positions, trajectory.dimension(), segments)?;

    let samples = (10 * n).max(200);
    let polyline: Vec<Position> = (0..samples)
        .map(|k| spline.evaluate(parameter(k, samples)))
        .collect();
    let projections = positions.iter().map(|p| project(&polyline, p)).collect();

    Ok((spline, projections))
}
