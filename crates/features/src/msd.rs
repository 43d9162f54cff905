//! Mean squared displacement and the least-squares fits built on it.

use nalgebra::{Matrix2, Vector2};
use tracksim_core::Position;

/// Mean squared displacement at `lag` frames over all overlapping pairs.
///
/// Returns `None` if `lag` is zero or leaves no pair of positions.
pub(crate) fn msd(positions: &[Position], lag: usize) -> Option<f64> {
    if lag == 0 || lag >= positions.len() {
        return None;
    }
    let pairs = positions.len() - lag;
    let sum: f64 = (0..pairs)
        .map(|i| (positions[i + lag] - positions[i]).norm_squared())
        .sum();
    Some(sum / pairs as f64)
}

/// Mean squared displacement of a scalar series at `lag`.
pub(crate) fn msd_scalar(values: &[f64], lag: usize) -> Option<f64> {
    if lag == 0 || lag >= values.len() {
        return None;
    }
    let pairs = values.len() - lag;
    let sum: f64 = (0..pairs).map(|i| (values[i + lag] - values[i]).powi(2)).sum();
    Some(sum / pairs as f64)
}

/// MSD values for each lag in `lags`, or `None` if any lag is out of range.
pub(crate) fn msd_curve(
    positions: &[Position],
    lags: impl IntoIterator<Item = usize>,
) -> Option<Vec<(usize, f64)>> {
    lags.into_iter()
        .map(|lag| msd(positions, lag).map(|value| (lag, value)))
        .collect()
}

/// Ordinary least-squares line `y = slope·x + intercept`.
///
/// Returns `None` for fewer than two points or constant `x`.
pub(crate) fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Least-squares slope of `y = k·x`.
pub(crate) fn fit_through_origin(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let sxx: f64 = xs.iter().map(|x| x * x).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    Some(sxy / sxx)
}

/// Least-squares `y = a·x + c·x²`, returned as `(a, c)`.
pub(crate) fn fit_linear_quadratic(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let (mut s2, mut s3, mut s4, mut sy1, mut sy2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let x2 = x * x;
        s2 += x2;
        s3 += x2 * x;
        s4 += x2 * x2;
        sy1 += x * y;
        sy2 += x2 * y;
    }

    let normal = Matrix2::new(s2, s3, s3, s4);
    let solution = normal.lu().solve(&Vector2::new(sy1, sy2))?;
    let (a, c) = (solution[0], solution[1]);
    (a.is_finite() && c.is_finite()).then_some((a, c))
}
