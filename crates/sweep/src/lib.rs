//! Parameter sweeps producing labelled trajectory data sets.
//!
//! A sweep generates free, confined, active, and anomalous tracks for every
//! combination of track length and drift speed in a [`SweepConfig`],
//! computes the standard feature battery on each, and writes the results as
//! JSON. All randomness comes from one [`RandomSource`] seeded from the
//! config, so a config fully determines its output.
//!
//! [`RandomSource`]: tracksim_core::RandomSource

mod config;
mod error;
mod run;

pub mod label;

pub use config::{
    AnomalousConfig, ConfigError, ConfinedConfig, DriftConfig, FeatureConfig, SweepConfig,
};
pub use error::SweepError;
pub use label::Mode;
pub use run::{CalibratedScene, SweepOutput, run};
