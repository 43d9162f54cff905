use thiserror::Error;

use crate::params::ParamError;

/// Errors that can occur while building or sampling from a scene.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("obstacle centre uses an axis beyond the scene's {expected} dimension(s)")]
    DimensionMismatch { expected: usize },

    #[error("{what}: gave up after {attempts} attempts")]
    RejectionSamplingExhausted { what: &'static str, attempts: usize },
}
