use std::fmt;

use thiserror::Error;
use tracksim_core::{FeatureValue, Trajectory};

use crate::{
    AspectRatio, DirectionStd, Elongation, FeatureExtractor, FractalDimension, LagWindow,
    MsdCurvature, PowerLaw, ShortLongDRatio, ShortLongMsdRatio, SplineDynamics, SplineSpatial,
};

/// Errors that can occur when registering an extractor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("an extractor named `{0}` is already registered")]
    DuplicateName(String),
}

/// An ordered set of feature extractors with unique names.
#[derive(Default)]
pub struct Registry {
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard battery of all ten extractors.
    ///
    /// `segments` and `lag` configure the spline descriptors and `points`
    /// the short-time/long-time ratios. The power law is fitted over lags
    /// `1..=n/20` and the direction spread is measured at lag `n/20`, where
    /// `n` is the number of positions.
    #[must_use]
    pub fn reference(segments: usize, lag: usize, points: usize) -> Self {
        let extractors: Vec<Box<dyn FeatureExtractor>> = vec![
            Box::new(AspectRatio),
            Box::new(Elongation),
            Box::new(FractalDimension),
            Box::new(MsdCurvature::default()),
            Box::new(PowerLaw::new(1, LagWindow::Fraction(20))),
            Box::new(DirectionStd::new(LagWindow::Fraction(20))),
            Box::new(SplineDynamics::new(segments, lag)),
            Box::new(SplineSpatial::new(segments)),
            Box::new(ShortLongDRatio::new(points)),
            Box::new(ShortLongMsdRatio::new(points)),
        ];
        Self { extractors }
    }

    /// Adds an extractor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if an extractor with the same
    /// name is already registered.
    pub fn register<E>(&mut self, extractor: E) -> Result<(), RegistryError>
    where
        E: FeatureExtractor + 'static,
    {
        if self.names().any(|name| name == extractor.name()) {
            return Err(RegistryError::DuplicateName(extractor.name().to_owned()));
        }
        self.extractors.push(Box::new(extractor));
        Ok(())
    }

    /// Returns the registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extractors.iter().map(|e| e.name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Computes every feature and stores it on `trajectory`.
    ///
    /// Degenerate results are stored as [`FeatureValue::Undefined`].
    pub fn apply(&self, trajectory: &mut Trajectory) {
        for extractor in &self.extractors {
            let value = match extractor.extract(trajectory) {
                Ok(value) => value,
                Err(degenerate) => {
                    tracing::debug!(
                        feature = extractor.name(),
                        label = trajectory.label(),
                        reason = degenerate.reason(),
                        "feature undefined"
                    );
                    FeatureValue::Undefined
                }
            };
            trajectory.set_feature(extractor.name(), value);
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
