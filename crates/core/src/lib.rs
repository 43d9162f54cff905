//! Core types for simulating and measuring particle trajectories.
//!
//! This crate defines the shared abstractions that simulators, feature
//! extractors, and exporters build on:
//!
//! - [`Trajectory`]: an immutable sequence of positions plus a label and a
//!   mutable map of computed features
//! - [`Dimension`]: the spatial dimension (1, 2, or 3) of a trajectory
//! - [`FeatureValue`]: a scalar, a sequence, or an undefined marker
//! - [`RandomSource`]: the explicitly passed, seeded stream of uniform and
//!   Gaussian deviates
//! - [`Observer`]: receives simulation events and optionally returns
//!   control actions

mod dimension;
mod feature;
mod observer;
mod random;
mod trajectory;

pub use dimension::{Dimension, InvalidDimension};
pub use feature::FeatureValue;
pub use observer::Observer;
pub use random::RandomSource;
pub use trajectory::{Position, Trajectory, TrajectoryError};
