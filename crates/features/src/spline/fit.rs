use nalgebra::{DMatrix, DVector};
use tracksim_core::{Dimension, Position};

use crate::Degenerate;

const DEGREE: usize = 3;

/// A clamped B-spline curve in position space.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    control: Vec<Position>,
}

impl BSpline {
    /// Least-squares cubic spline through `positions` with `segments` uniform
    /// knot spans over the parameter range `[0, 1]`.
    ///
    /// Position `i` of `n` is assigned the parameter `i / (n − 1)`.
    pub(super) fn fit(
        positions: &[Position],
        dimension: Dimension,
        segments: usize,
    ) -> Result<Self, Degenerate> {
        let n = positions.len();
        let segments = segments.max(1);
        let knots = clamped_uniform_knots(segments);
        let count = segments + DEGREE;
        if n < count {
            return Err(Degenerate::new("fewer positions than spline coefficients"));
        }

        let mut design = DMatrix::zeros(n, count);
        for row in 0..n {
            for (col, value) in basis(&knots, DEGREE, parameter(row, n)).into_iter().enumerate() {
                design[(row, col)] = value;
            }
        }
        let normal = design.transpose() * &design;
        let cholesky = normal
            .cholesky()
            .ok_or(Degenerate::new("spline normal equations are singular"))?;

        let mut control = vec![Position::zeros(); count];
        for axis in 0..dimension.get() {
            let rhs = design.transpose() * DVector::from_iterator(n, positions.iter().map(|p| p[axis]));
            let coefficients = cholesky.solve(&rhs);
            for (point, value) in control.iter_mut().zip(coefficients.iter()) {
                point[axis] = *value;
            }
        }

        Ok(Self {
            degree: DEGREE,
            knots,
            control,
        })
    }

    /// Evaluates the curve at parameter `t ∈ [0, 1]`.
    pub(super) fn evaluate(&self, t: f64) -> Position {
        basis(&self.knots, self.degree, t)
            .into_iter()
            .zip(&self.control)
            .map(|(weight, point)| point * weight)
            .sum()
    }

    /// Returns the derivative curve with respect to the parameter.
    pub(super) fn derivative(&self) -> Self {
        let p = self.degree;
        let control = self
            .control
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let span = self.knots[i + p + 1] - self.knots[i + 1];
                if span > 0.0 {
                    (w[1] - w[0]) * (p as f64 / span)
                } else {
                    Position::zeros()
                }
            })
            .collect();

        Self {
            degree: p.saturating_sub(1),
            knots: self.knots[1..self.knots.len() - 1].to_vec(),
            control,
        }
    }
}

/// The parameter assigned to position `i` of `n`.
pub(super) fn parameter(i: usize, n: usize) -> f64 {
    if n < 2 { 0.0 } else { i as f64 / (n - 1) as f64 }
}

/// Knots `[0; 4] ++ [1/s, …, (s−1)/s] ++ [1; 4]` for a cubic with `s` spans.
fn clamped_uniform_knots(segments: usize) -> Vec<f64> {
    let mut knots = vec![0.0; DEGREE + 1];
    knots.extend((1..segments).map(|k| k as f64 / segments as f64));
    knots.extend(std::iter::repeat_n(1.0, DEGREE + 1));
    knots
}

/// Values of all `knots.len() − degree − 1` B-spline basis functions at `t`
/// (Cox–de Boor recursion).
///
/// The right end of the last non-empty span is treated as closed, so the
/// basis still sums to one at `t = 1`.
fn basis(knots: &[f64], degree: usize, t: f64) -> Vec<f64> {
    let last = knots.len() - 1;
    let end = knots[last];

    let mut values: Vec<f64> = (0..last)
        .map(|i| {
            let (lo, hi) = (knots[i], knots[i + 1]);
            let inside = lo <= t && t < hi;
            let closing = t >= end && hi == end && lo < hi;
            if inside || closing { 1.0 } else { 0.0 }
        })
        .collect();

    for p in 1..=degree {
        values = (0..last - p)
            .map(|i| {
                let left_span = knots[i + p] - knots[i];
                let right_span = knots[i + p + 1] - knots[i + 1];
                let left = if left_span > 0.0 {
                    (t - knots[i]) / left_span * values[i]
                } else {
                    0.0
                };
                let right = if right_span > 0.0 {
                    (knots[i + p + 1] - t) / right_span * values[i + 1]
                } else {
                    0.0
                };
                left + right
            })
            .collect();
    }
    values
}

/// A position's location relative to a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Projection {
    /// Arc length from the start of the polyline to the foot point.
    pub(super) arc_length: f64,
    /// Offset from the foot point to the position.
    pub(super) offset: Position,
}

/// Projects `point` onto the nearest segment of `polyline`.
pub(super) fn project(polyline: &[Position], point: &Position) -> Projection {
    let mut best = Projection {
        arc_length: 0.0,
        offset: point - polyline[0],
    };
    let mut best_distance = best.offset.norm_squared();
    let mut travelled = 0.0;

    for w in polyline.windows(2) {
        let segment = w[1] - w[0];
        let length_sq = segment.norm_squared();
        let fraction = if length_sq > 0.0 {
            ((point - w[0]).dot(&segment) / length_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let foot = w[0] + segment * fraction;
        let offset = point - foot;
        let distance = offset.norm_squared();
        if distance < best_distance {
            best_distance = distance;
            best = Projection {
                arc_length: travelled + fraction * length_sq.sqrt(),
                offset,
            };
        }
        travelled += length_sq.sqrt();
    }
    best
}
