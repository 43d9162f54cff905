use thiserror::Error;
use tracksim_core::{Trajectory, TrajectoryError};

/// Errors that can occur when superimposing two trajectories.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CombineError {
    #[error("cannot combine a {base}-step trajectory with a {drift}-step drift")]
    DimensionMismatch { base: usize, drift: usize },

    #[error("cannot combine a {base}-D trajectory with a {drift}-D drift")]
    AxisMismatch { base: usize, drift: usize },

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}

/// Superimposes `drift` onto `base` by summing positions index by index.
///
/// Both trajectories start at their own origin, so the result is
/// `base[i] + drift[i]`. It keeps the base's dimension, frame interval, and
/// label, and carries no features.
///
/// # Errors
///
/// Returns [`CombineError::DimensionMismatch`] if the step counts differ and
/// [`CombineError::AxisMismatch`] if the dimensions differ.
pub fn combine(base: &Trajectory, drift: &Trajectory) -> Result<Trajectory, CombineError> {
    if base.step_count() != drift.step_count() {
        return Err(CombineError::DimensionMismatch {
            base: base.step_count(),
            drift: drift.step_count(),
        });
    }
    if base.dimension() != drift.dimension() {
        return Err(CombineError::AxisMismatch {
            base: base.dimension().get(),
            drift: drift.dimension().get(),
        });
    }

    let positions = base
        .positions()
        .iter()
        .zip(drift.positions())
        .map(|(b, d)| b + d)
        .collect();

    let combined = Trajectory::new(base.dimension(), positions, base.frame_interval())?;
    Ok(combined.with_label(base.label()))
}
