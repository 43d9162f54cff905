//! Descriptors computed over finished trajectories.
//!
//! Each descriptor is a [`FeatureExtractor`]: a small value type holding its
//! own parameters that reads a [`Trajectory`]'s positions and produces one
//! [`FeatureValue`]. A [`Registry`] applies a set of extractors, writing each
//! result under the extractor's name.
//!
//! # Extractors
//!
//! - [`AspectRatio`], [`Elongation`]: gyration tensor eigenvalue ratios
//! - [`FractalDimension`]: Katz–George path fractal dimension
//! - [`MsdCurvature`], [`PowerLaw`]: shape of the mean squared displacement
//! - [`DirectionStd`]: spread of turning angles at a fixed lag
//! - [`SplineDynamics`], [`SplineSpatial`]: motion along and across a
//!   smoothing spline
//! - [`ShortLongDRatio`], [`ShortLongMsdRatio`]: short-time versus
//!   long-time behaviour
//!
//! # Degenerate inputs
//!
//! Trajectories that are too short or too regular for a descriptor yield a
//! [`Degenerate`] error from [`FeatureExtractor::extract`]. The registry
//! stores those as [`FeatureValue::Undefined`] and moves on, so one
//! degenerate descriptor never prevents the others from being computed.

mod degenerate;
mod dynamics;
mod lag;
mod msd;
mod ratio;
mod registry;
mod shape;
mod spline;

pub use degenerate::Degenerate;
pub use dynamics::{DirectionStd, MsdCurvature, PowerLaw};
pub use lag::LagWindow;
pub use ratio::{ShortLongDRatio, ShortLongMsdRatio};
pub use registry::{Registry, RegistryError};
pub use shape::{AspectRatio, Elongation, FractalDimension};
pub use spline::{SplineDynamics, SplineSpatial};

use tracksim_core::{FeatureValue, Trajectory};

/// A named analysis over a finished trajectory.
///
/// Implementations must be pure: they read the trajectory's positions and
/// return a value, leaving the trajectory untouched.
pub trait FeatureExtractor {
    /// Returns the key under which the result is stored.
    fn name(&self) -> &str;

    /// Computes the feature.
    ///
    /// # Errors
    ///
    /// Returns [`Degenerate`] if the trajectory is too short or otherwise
    /// unsuitable for this feature.
    fn extract(&self, trajectory: &Trajectory) -> Result<FeatureValue, Degenerate>;
}
