use std::{fs, path::Path};

use tracing::{debug, info, info_span, warn};
use tracksim_core::{RandomSource, Trajectory};
use tracksim_export::{write_scene, write_trajectories};
use tracksim_simulators::{
    Action, ActiveTransport, AnomalousDiffusion, ConfinedDiffusion, DiffusionParams, Event,
    FreeDiffusion, ObstacleScene, SceneBuilder, SceneError, Simulator, combine,
    interaction_radius, sample_start_position,
};
use uom::si::{
    angular_velocity::radian_per_second, f64::Time, length::meter, time::second,
    velocity::meter_per_second,
};

use crate::{
    SweepConfig, SweepError,
    label::{self, Mode},
};

/// An obstacle scene calibrated for one track length.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedScene {
    pub track_length: Time,
    /// Radius of the disk whose non-interaction probability was targeted.
    pub test_radius: f64,
    pub scene: ObstacleScene,
}

impl CalibratedScene {
    /// Name of the JSON file this scene is written to.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("obstacles_tl_{}.json", self.track_length.get::<second>())
    }
}

/// Every track and scene produced by [`run`], grouped by mode.
#[derive(Debug, Clone, Default)]
pub struct SweepOutput {
    pub free: Vec<Trajectory>,
    pub confined: Vec<Trajectory>,
    pub active: Vec<Trajectory>,
    pub anomalous: Vec<Trajectory>,
    pub scenes: Vec<CalibratedScene>,
}

impl SweepOutput {
    #[must_use]
    pub fn tracks(&self, mode: Mode) -> &[Trajectory] {
        match mode {
            Mode::Free => &self.free,
            Mode::Confined => &self.confined,
            Mode::Active => &self.active,
            Mode::Anomalous => &self.anomalous,
        }
    }

    fn tracks_mut(&mut self, mode: Mode) -> &mut Vec<Trajectory> {
        match mode {
            Mode::Free => &mut self.free,
            Mode::Confined => &mut self.confined,
            Mode::Active => &mut self.active,
            Mode::Anomalous => &mut self.anomalous,
        }
    }

    /// Returns the total number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.free.len() + self.confined.len() + self.active.len() + self.anomalous.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes one JSON file per mode and one per scene into `dir`, creating
    /// it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be written.
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<(), SweepError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| SweepError::Io {
            path: dir.to_owned(),
            source,
        })?;

        for mode in [Mode::Free, Mode::Confined, Mode::Active, Mode::Anomalous] {
            let path = dir.join(mode.file_name());
            write_trajectories(&path, self.tracks(mode))?;
            info!(path = %path.display(), tracks = self.tracks(mode).len(), "wrote tracks");
        }
        for calibrated in &self.scenes {
            let path = dir.join(calibrated.file_name());
            write_scene(&path, &calibrated.scene)?;
            info!(path = %path.display(), "wrote scene");
        }
        Ok(())
    }
}

/// Runs the full sweep, drawing every random number from `rng`.
///
/// Scenes are calibrated first, one per track length. Then for each track
/// length and drift speed, free and confined tracks are generated (with the
/// drift superimposed when the speed is non-zero) followed by pure active
/// transport tracks. Anomalous tracks come last, and finally every track's
/// features are computed.
///
/// # Errors
///
/// Returns an error if the config is invalid, a scene cannot reach its
/// target, or a simulator fails.
pub fn run(config: &SweepConfig, rng: &mut RandomSource) -> Result<SweepOutput, SweepError> {
    config.validate()?;
    let _span = info_span!("sweep", seed = rng.seed()).entered();

    let mut output = SweepOutput {
        scenes: calibrate_scenes(config, rng)?,
        ..SweepOutput::default()
    };

    let d = config.diffusion_coefficient;
    let dt = config.dt();
    let omega = config.drift.angular_velocity.get::<radian_per_second>();
    let rejection = config.rejection()?;

    for &length in &config.track_lengths {
        let seconds = length.get::<second>();
        let steps = config.steps_for(length);
        let params = DiffusionParams::new(d, dt, config.dimension, steps)?;
        let radius = interaction_radius(config.confined.prob_non_interaction, d, seconds)?;
        let confined = ConfinedDiffusion::new(params, radius)?.with_rejection(rejection);

        for speed in &config.drift.speeds {
            let speed = speed.get::<meter_per_second>();
            let drift = ActiveTransport::new(speed, omega, dt, config.dimension, steps)?;

            for mode in [Mode::Free, Mode::Confined, Mode::Active] {
                if mode == Mode::Active && speed == 0.0 {
                    continue;
                }

                for _ in 0..config.tracks_per_case {
                    let track = match mode {
                        Mode::Free => FreeDiffusion::new(params)
                            .simulate(rng)?
                            .with_label(label::free(d, dt)),
                        Mode::Confined => confined
                            .simulate(rng)?
                            .with_label(label::confined(d, dt, radius)),
                        Mode::Active | Mode::Anomalous => {
                            drift.simulate(rng)?.with_label(label::active(speed, omega))
                        }
                    };

                    let track = if mode != Mode::Active && speed != 0.0 {
                        let mut drifted = combine(&track, &drift.simulate(rng)?)?;
                        drifted.append_label(&label::drift(speed, omega));
                        drifted
                    } else {
                        track
                    };
                    output.tracks_mut(mode).push(track);
                }
                info!(%mode, seconds, speed, tracks = config.tracks_per_case, "generated");
            }
        }
    }

    let margin = config.anomalous.start_margin_m();
    for calibrated in &output.scenes {
        let seconds = calibrated.track_length.get::<second>();
        let steps = config.steps_for(calibrated.track_length);
        let params = DiffusionParams::new(d, dt, config.dimension, steps)?;
        let name = label::anomalous(d, dt, calibrated.scene.estimate_excluded_volume_fraction());

        let mut exhausted = 0usize;
        for _ in 0..config.tracks_per_case {
            let start = sample_start_position(
                &calibrated.scene,
                margin,
                rng,
                config.anomalous.start_attempts,
            )
            .map_err(|source| SweepError::Scene { seconds, source })?;
            let track = AnomalousDiffusion::new(params, &calibrated.scene, start)?
                .with_rejection(rejection)
                .simulate_observed(rng, |event: &Event| -> Option<Action> {
                    if event.exhausted {
                        exhausted += 1;
                    }
                    None
                })?
                .with_label(name.clone());
            output.anomalous.push(track);
        }
        if exhausted > 0 {
            warn!(seconds, exhausted, "anomalous steps stayed put after exhausting rejections");
        }
        info!(mode = %Mode::Anomalous, seconds, tracks = config.tracks_per_case, "generated");
    }

    let registry = config.features.registry();
    for mode in [Mode::Free, Mode::Confined, Mode::Active, Mode::Anomalous] {
        for track in output.tracks_mut(mode) {
            registry.apply(track);
        }
    }
    info!(tracks = output.len(), features = registry.len(), "computed features");

    Ok(output)
}

fn calibrate_scenes(
    config: &SweepConfig,
    rng: &mut RandomSource,
) -> Result<Vec<CalibratedScene>, SweepError> {
    let anomalous = &config.anomalous;
    let size = anomalous.size_m();
    let mean = anomalous.diameter_mean.get::<meter>();
    let sd = anomalous.diameter_sd.get::<meter>();

    config
        .track_lengths
        .iter()
        .map(|&track_length| -> Result<CalibratedScene, SweepError> {
            let seconds = track_length.get::<second>();
            let scene_error = |source: SceneError| SweepError::Scene { seconds, source };

            let test_radius = interaction_radius(
                anomalous.calibration_probability,
                config.diffusion_coefficient,
                seconds,
            )?;
            let scene = SceneBuilder::new(&size, mean, sd)
                .map_err(scene_error)?
                .allow_overlap(anomalous.allow_overlap)
                .build(test_radius, anomalous.target_probability, rng)
                .map_err(scene_error)?;

            info!(
                seconds,
                test_radius,
                obstacles = scene.obstacles().len(),
                excluded = scene.estimate_excluded_volume_fraction(),
                "calibrated scene"
            );
            debug!(p = scene.estimate_prob_non_interaction(test_radius), "non-interaction");

            Ok(CalibratedScene {
                track_length,
                test_radius,
                scene,
            })
        })
        .collect()
}
