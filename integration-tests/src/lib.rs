//! Shared fixtures for the cross-crate tests.

use tracksim_core::{Dimension, RandomSource};
use tracksim_simulators::{
    DiffusionParams, ObstacleScene, SceneBuilder, SceneError, interaction_radius,
};

/// Diffusion coefficient of a 50 nm particle in water at 22 °C, in m²/s.
pub const DIFFUSION: f64 = 9.02e-14;

/// Frame interval of a 30 fps camera, in seconds.
pub const FRAME: f64 = 1.0 / 30.0;

/// Two-dimensional parameters for `steps` frames.
///
/// # Panics
///
/// Panics if `steps` is zero.
#[must_use]
pub fn params(steps: usize) -> DiffusionParams {
    DiffusionParams::new(DIFFUSION, FRAME, Dimension::Two, steps).expect("valid parameters")
}

/// Builds a 10 µm square scene calibrated for `seconds`-long tracks.
///
/// # Errors
///
/// Returns an error if the scene cannot reach a non-interaction probability
/// of 0.05.
///
/// # Panics
///
/// Panics if `seconds` is not positive.
pub fn calibrated_scene(seconds: f64, rng: &mut RandomSource) -> Result<(ObstacleScene, f64), SceneError> {
    let test_radius = interaction_radius(0.1, DIFFUSION, seconds).expect("valid duration");
    let scene = SceneBuilder::new(&[10e-6, 10e-6], 1e-6, 0.5e-6 / 3.0)?.build(test_radius, 0.05, rng)?;
    Ok((scene, test_radius))
}
