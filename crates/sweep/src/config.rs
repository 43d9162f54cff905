use std::{f64::consts::FRAC_PI_4, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracksim_core::Dimension;
use tracksim_features::Registry;
use tracksim_simulators::{Exhaustion, RejectionConfig};
use uom::si::{
    angular_velocity::radian_per_second,
    f64::{AngularVelocity, Length, Time, Velocity},
    length::{meter, micrometer},
    time::second,
    velocity::micrometer_per_second,
};

use crate::SweepError;

/// The full parameter set of a sweep.
///
/// Every field has a default reproducing the reference data set: a 50 nm
/// particle in water at 22 °C, filmed at 30 frames per second, with tracks
/// of 2, 6, and 18 seconds. Quantities are written in SI base units in TOML
/// (seconds, meters, m/s, rad/s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Seed of the single random stream shared by the whole sweep.
    pub seed: u64,
    /// Diffusion coefficient in m²/s.
    pub diffusion_coefficient: f64,
    pub time_step: Time,
    pub dimension: Dimension,
    pub track_lengths: Vec<Time>,
    /// Trajectories generated per mode, drift speed, and track length.
    pub tracks_per_case: usize,
    /// Rejection attempts per confined or anomalous step before staying put.
    pub max_rejections: usize,
    pub drift: DriftConfig,
    pub confined: ConfinedConfig,
    pub anomalous: AnomalousConfig,
    pub features: FeatureConfig,
}

/// Drift superimposed on free and confined tracks, and used alone for
/// active transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriftConfig {
    pub speeds: Vec<Velocity>,
    pub angular_velocity: AngularVelocity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfinedConfig {
    /// Probability of not reaching the boundary over a track, which sets the
    /// confinement radius per track length.
    pub prob_non_interaction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnomalousConfig {
    pub scene_size: Vec<Length>,
    pub diameter_mean: Length,
    pub diameter_sd: Length,
    pub allow_overlap: bool,
    /// Probability used to derive the test radius for each track length.
    pub calibration_probability: f64,
    /// Obstacles are added until the non-interaction estimate is at most
    /// this.
    pub target_probability: f64,
    /// Start positions keep `diameter_mean + start_margin_sds · diameter_sd`
    /// from every edge.
    pub start_margin_sds: f64,
    pub start_attempts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    pub spline_segments: usize,
    pub spline_lag: usize,
    pub ratio_points: usize,
}

/// Errors found when validating a [`SweepConfig`].
///
/// Per-simulator parameters are validated by the simulators themselves.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("at least one track length is required")]
    NoTrackLengths,

    #[error("track length {seconds} s is shorter than one time step")]
    TrackTooShort { seconds: f64 },

    #[error("scene size has {found} entries, expected {expected}")]
    SceneSize { expected: usize, found: usize },

    #[error("tracks_per_case must be at least 1")]
    NoTracks,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            seed: 22,
            diffusion_coefficient: 9.02e-14,
            time_step: Time::new::<second>(1.0 / 30.0),
            dimension: Dimension::Two,
            track_lengths: [2.0, 6.0, 18.0].map(Time::new::<second>).to_vec(),
            tracks_per_case: 500,
            max_rejections: RejectionConfig::default().max_attempts(),
            drift: DriftConfig::default(),
            confined: ConfinedConfig::default(),
            anomalous: AnomalousConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            speeds: [0.0, 0.27, 0.8, 2.4].map(Velocity::new::<micrometer_per_second>).to_vec(),
            angular_velocity: AngularVelocity::new::<radian_per_second>(FRAC_PI_4),
        }
    }
}

impl Default for ConfinedConfig {
    fn default() -> Self {
        Self {
            prob_non_interaction: 0.1,
        }
    }
}

impl Default for AnomalousConfig {
    fn default() -> Self {
        Self {
            scene_size: vec![Length::new::<micrometer>(10.0); 2],
            diameter_mean: Length::new::<micrometer>(1.0),
            diameter_sd: Length::new::<micrometer>(0.5 / 3.0),
            allow_overlap: false,
            calibration_probability: 0.1,
            target_probability: 0.05,
            start_margin_sds: 3.0,
            start_attempts: 10_000,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            spline_segments: 7,
            spline_lag: 1,
            ratio_points: 3,
        }
    }
}

impl SweepConfig {
    /// Parses a TOML document; omitted fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, has unknown keys,
    /// or fails [`SweepConfig::validate`].
    pub fn from_toml_str(input: &str) -> Result<Self, SweepError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are
    /// invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SweepError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| SweepError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Checks the cross-field constraints the simulators cannot see.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no track lengths, a track is shorter
    /// than one step, no tracks are requested, or the scene size does not
    /// match the dimension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.track_lengths.is_empty() {
            return Err(ConfigError::NoTrackLengths);
        }
        for length in &self.track_lengths {
            if self.steps_for(*length) == 0 {
                return Err(ConfigError::TrackTooShort {
                    seconds: length.get::<second>(),
                });
            }
        }
        if self.tracks_per_case == 0 {
            return Err(ConfigError::NoTracks);
        }
        let expected = self.dimension.get();
        if self.anomalous.scene_size.len() != expected {
            return Err(ConfigError::SceneSize {
                expected,
                found: self.anomalous.scene_size.len(),
            });
        }
        Ok(())
    }

    /// Time step in seconds.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.time_step.get::<second>()
    }

    /// Number of steps covering `length`, rounded to the nearest integer.
    #[must_use]
    pub fn steps_for(&self, length: Time) -> usize {
        let steps = (length.get::<second>() / self.dt()).round();
        if steps.is_finite() && steps > 0.0 {
            steps as usize
        } else {
            0
        }
    }

    /// Per-step rejection bounds shared by confined and anomalous tracks.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_rejections` is zero.
    pub fn rejection(&self) -> Result<RejectionConfig, SweepError> {
        Ok(RejectionConfig::new(self.max_rejections, Exhaustion::StayPut)?)
    }
}

impl AnomalousConfig {
    /// Scene extent per axis in meters.
    #[must_use]
    pub fn size_m(&self) -> Vec<f64> {
        self.scene_size.iter().map(|s| s.get::<meter>()).collect()
    }

    /// Distance kept between start positions and the scene edges, in meters.
    #[must_use]
    pub fn start_margin_m(&self) -> f64 {
        (self.diameter_mean + self.diameter_sd * self.start_margin_sds).get::<meter>()
    }
}

impl FeatureConfig {
    /// Builds the feature battery applied to every generated track.
    #[must_use]
    pub fn registry(&self) -> Registry {
        Registry::reference(self.spline_segments, self.spline_lag, self.ratio_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{angular_velocity::radian_per_second, velocity::meter_per_second};

    #[test]
    fn defaults_match_reference_sweep() {
        let config = SweepConfig::default();

        assert_eq!(config.seed, 22);
        assert_relative_eq!(config.dt(), 1.0 / 30.0);
        assert_eq!(
            config.track_lengths.iter().map(|t| config.steps_for(*t)).collect::<Vec<_>>(),
            vec![60, 180, 540]
        );
        assert_relative_eq!(config.drift.speeds[3].get::<meter_per_second>(), 2.4e-6, max_relative = 1e-12);
        assert_relative_eq!(config.anomalous.start_margin_m(), 1.5e-6, max_relative = 1e-12);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn parses_partial_toml_in_si_units() {
        let config = SweepConfig::from_toml_str(
            r#"
            seed = 7
            time_step = 0.05
            track_lengths = [1, 3.5]
            tracks_per_case = 4

            [drift]
            speeds = [0.0, 1e-6]
            angular_velocity = 0.5

            [anomalous]
            scene_size = [5e-6, 4e-6]
            "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, 7);
        assert_eq!(config.steps_for(config.track_lengths[1]), 70);
        assert_eq!(config.tracks_per_case, 4);
        assert_relative_eq!(config.drift.angular_velocity.get::<radian_per_second>(), 0.5);
        assert_eq!(config.anomalous.size_m(), vec![5e-6, 4e-6]);
        assert_relative_eq!(config.diffusion_coefficient, 9.02e-14);
        assert_eq!(config.features, FeatureConfig::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = SweepConfig::from_toml_str("tracks = 3");
        assert!(matches!(result, Err(SweepError::Parse(_))));
    }

    #[test]
    fn rejects_inconsistent_configs() {
        let cases = [
            ("track_lengths = []", ConfigError::NoTrackLengths),
            ("track_lengths = [0.001]", ConfigError::TrackTooShort { seconds: 0.001 }),
            ("tracks_per_case = 0", ConfigError::NoTracks),
            ("dimension = 3", ConfigError::SceneSize { expected: 3, found: 2 }),
        ];

        for (input, expected) in cases {
            match SweepConfig::from_toml_str(input) {
                Err(SweepError::Config(err)) => assert_eq!(err, expected, "{input}"),
                other => panic!("{input}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_invalid_dimension() {
        assert!(matches!(
            SweepConfig::from_toml_str("dimension = 4"),
            Err(SweepError::Parse(_))
        ));
    }
}
