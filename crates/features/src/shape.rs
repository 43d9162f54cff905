use nalgebra::{DMatrix, SymmetricEigen};
use tracksim_core::{Dimension, FeatureValue, Position, Trajectory};

use crate::{Degenerate, FeatureExtractor};

/// Aspect ratio `√(λmax/λmin)` of the gyration tensor.
///
/// Undefined for 1-D trajectories and for point sets with no spread along
/// some axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AspectRatio;

impl FeatureExtractor for AspectRatio {
    fn name(&self) -> &str {
        "aspect_ratio"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let (min, max) = gyration_extremes(trajectory)?;
        if min <= max * 1e-12 {
            return Err(Degenerate::new("gyration tensor is singular"));
        }
        Ok(FeatureValue::Scalar((max / min).sqrt()))
    }
}

/// Elongation `1 − √(λmin/λmax)` of the gyration tensor.
///
/// Zero for an isotropic cloud and one for a straight line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elongation;

impl FeatureExtractor for Elongation {
    fn name(&self) -> &str {
        "elongation"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let (min, max) = gyration_extremes(trajectory)?;
        if max <= 0.0 {
            return Err(Degenerate::new("all positions coincide"));
        }
        Ok(FeatureValue::Scalar(1.0 - (min.max(0.0) / max).sqrt()))
    }
}

/// Katz–George fractal dimension `ln N / (ln N + ln(d/L))`.
///
/// `N` is the step count, `L` the path length, and `d` the largest distance
/// between any two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FractalDimension;

impl FeatureExtractor for FractalDimension {
    fn name(&self) -> &str {
        "fractal_dimension"
    }

    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate> {
        let steps = trajectory.step_count();
        if steps < 2 {
            return Err(Degenerate::new("fewer than two steps"));
        }

        let length: f64 = trajectory.steps().map(|s| s.norm()).sum();
        if length <= 0.0 {
            return Err(Degenerate::new("path has zero length"));
        }

        let diameter = max_pairwise_distance(trajectory.positions());
        let n = (steps as f64).ln();
        let denominator = n + (diameter / length).ln();
        if denominator.abs() < 1e-12 {
            return Err(Degenerate::new("path extent equals length / steps"));
        }
        Ok(FeatureValue::Scalar(n / denominator))
    }
}

/// Smallest and largest eigenvalue of the gyration tensor over the active
/// axes.
fn gyration_extremes(trajectory: &Trajectory) -> Result<(f64, f64), Degenerate> {
    if trajectory.dimension() == Dimension::One {
        return Err(Degenerate::new("gyration tensor needs at least two axes"));
    }

    let eigenvalues = SymmetricEigen::new(gyration_tensor(trajectory)).eigenvalues;
    let min = eigenvalues.min();
    let max = eigenvalues.max();
    Ok((min, max))
}

/// Covariance of the positions over the active axes.
fn gyration_tensor(trajectory: &Trajectory) -> DMatrix<f64> {
    let d = trajectory.dimension().get();
    let positions = trajectory.positions();
    let n = positions.len() as f64;

    let mean: Position = positions.iter().sum::<Position>() / n;
    DMatrix::from_fn(d, d, |i, j| {
        positions
            .iter()
            .map(|p| (p[i] - mean[i]) * (p[j] - mean[j]))
            .sum::<f64>()
            / n
    })
}

fn max_pairwise_distance(positions: &[Position]) -> f64 {
    let mut max = 0.0_f64;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            max = max.max((b - a).norm_squared());
        }
    }
    max.sqrt()
}
