use std::{io, path::PathBuf};

use thiserror::Error;
use tracksim_export::ExportError;
use tracksim_simulators::{CombineError, ParamError, SceneError, SimulationError};

use crate::ConfigError;

/// Errors that can occur while configuring or running a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("cannot access `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("scene for {seconds} s tracks")]
    Scene {
        seconds: f64,
        #[source]
        source: SceneError,
    },

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
