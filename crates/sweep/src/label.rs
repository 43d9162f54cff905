//! Labels identifying the generating process and parameters of a track.
//!
//! Diffusion coefficients are written in µm²/s, radii in µm, and drift speeds
//! in µm/s, so labels stay short and readable.

use std::fmt;

const MICRO: f64 = 1e6;

/// The process family of a generated track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Free,
    Confined,
    Active,
    Anomalous,
}

impl Mode {
    /// The label prefix of this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Free => "FREE",
            Mode::Confined => "CONFINED",
            Mode::Active => "ACTIVE",
            Mode::Anomalous => "ANOMALOUS",
        }
    }

    /// Name of the JSON file this mode's tracks are written to.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Mode::Free => "tracks_free.json",
            Mode::Confined => "tracks_confined.json",
            Mode::Active => "tracks_active.json",
            Mode::Anomalous => "tracks_anomalous.json",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn free(diffusion_coefficient: f64, dt: f64) -> String {
    format!(
        "{},D_{:.4},dt_{dt:.2}",
        Mode::Free,
        diffusion_coefficient * MICRO * MICRO
    )
}

#[must_use]
pub fn confined(diffusion_coefficient: f64, dt: f64, radius: f64) -> String {
    format!(
        "{},D_{:.4},dt_{dt:.3}_r_{:.1}",
        Mode::Confined,
        diffusion_coefficient * MICRO * MICRO,
        radius * MICRO
    )
}

#[must_use]
pub fn active(speed: f64, angular_velocity: f64) -> String {
    format!("{},{}", Mode::Active, drift(speed, angular_velocity))
}

#[must_use]
pub fn anomalous(diffusion_coefficient: f64, dt: f64, excluded_fraction: f64) -> String {
    format!(
        "{},D_{:.4},dt_{dt:.3},exVolFrac_{excluded_fraction:.2}",
        Mode::Anomalous,
        diffusion_coefficient * MICRO * MICRO
    )
}

/// The suffix appended to tracks with a superimposed drift.
#[must_use]
pub fn drift(speed: f64, angular_velocity: f64) -> String {
    format!(
        "DriftVelocity_{:.3},DriftAngleVelocity_{angular_velocity:.3}",
        speed * MICRO
    )
}
