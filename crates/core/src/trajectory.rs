use std::collections::BTreeMap;

use nalgebra::Vector3;
use thiserror::Error;

use crate::{Dimension, FeatureValue};

/// A position in meters.
///
/// Always three components; axes beyond the owning trajectory's dimension are
/// zero.
pub type Position = Vector3<f64>;

/// Errors that can occur when constructing a [`Trajectory`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrajectoryError {
    #[error("trajectory must contain at least one position")]
    Empty,

    #[error("frame interval must be finite and positive, got {value}")]
    FrameInterval { value: f64 },

    #[error("position {index} is non-finite or uses an axis beyond dimension {dimension}")]
    InvalidPosition { index: usize, dimension: usize },
}

/// An ordered sequence of positions with a label and computed features.
///
/// The positions are fixed at construction; only the label and the feature
/// map can change afterwards. Features are keyed by name and overwritten if
/// recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    dimension: Dimension,
    positions: Vec<Position>,
    frame_interval: f64,
    label: String,
    features: BTreeMap<String, FeatureValue>,
}

impl Trajectory {
    /// Creates a trajectory from positions sampled every `frame_interval`
    /// seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if `positions` is empty, the frame interval is not
    /// finite and positive, or a position is non-finite or has a nonzero
    /// component on an axis beyond `dimension`.
    pub fn new(
        dimension: Dimension,
        positions: Vec<Position>,
        frame_interval: f64,
    ) -> Result<Self, TrajectoryError> {
        if positions.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        if !frame_interval.is_finite() || frame_interval <= 0.0 {
            return Err(TrajectoryError::FrameInterval {
                value: frame_interval,
            });
        }

        let active = dimension.get();
        for (index, position) in positions.iter().enumerate() {
            let finite = position.iter().all(|c| c.is_finite());
            let flat = position.iter().skip(active).all(|c| *c == 0.0);
            if !finite || !flat {
                return Err(TrajectoryError::InvalidPosition {
                    index,
                    dimension: active,
                });
            }
        }

        Ok(Self {
            dimension,
            positions,
            frame_interval,
            label: String::new(),
            features: BTreeMap::new(),
        })
    }

    /// Sets the label, returning the trajectory.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Returns the number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; a trajectory holds at least its start position.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of steps, one less than the number of positions.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.positions.len() - 1
    }

    /// Returns the time between consecutive positions, in seconds.
    #[must_use]
    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Appends `suffix` to the label, separated by a comma when the label is
    /// not empty.
    pub fn append_label(&mut self, suffix: &str) {
        if !self.label.is_empty() {
            self.label.push(',');
        }
        self.label.push_str(suffix);
    }

    #[must_use]
    pub fn features(&self) -> &BTreeMap<String, FeatureValue> {
        &self.features
    }

    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// Stores a feature, replacing any previous value under the same name.
    pub fn set_feature(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.features.insert(name.into(), value);
    }

    /// Returns the displacement between consecutive positions.
    pub fn steps(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.windows(2).map(|w| w[1] - w[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn line(n: usize) -> Trajectory {
        let positions = (0..n)
            .map(|i| Position::new(i as f64, 0.0, 0.0))
            .collect();
        Trajectory::new(Dimension::Two, positions, 0.5).expect("valid trajectory")
    }

    #[test]
    fn step_count_is_one_less_than_length() {
        let t = line(5);
        assert_eq!(t.len(), 5);
        assert_eq!(t.step_count(), 4);
        assert_relative_eq!(t.frame_interval(), 0.5);
    }

    #[test]
    fn rejects_empty_positions() {
        let err = Trajectory::new(Dimension::Two, Vec::new(), 1.0);
        assert_eq!(err, Err(TrajectoryError::Empty));
    }

    #[test]
    fn rejects_bad_frame_interval() {
        let positions = vec![Position::zeros()];
        assert!(matches!(
            Trajectory::new(Dimension::Two, positions.clone(), 0.0),
            Err(TrajectoryError::FrameInterval { .. })
        ));
        assert!(matches!(
            Trajectory::new(Dimension::Two, positions, f64::NAN),
            Err(TrajectoryError::FrameInterval { .. })
        ));
    }

    #[test]
    fn rejects_component_beyond_dimension() {
        let positions = vec![Position::zeros(), Position::new(1.0, 2.0, 3.0)];
        let err = Trajectory::new(Dimension::Two, positions, 1.0);
        assert_eq!(
            err,
            Err(TrajectoryError::InvalidPosition {
                index: 1,
                dimension: 2
            })
        );
    }

    #[test]
    fn features_overwrite_by_name() {
        let mut t = line(3);
        t.set_feature("speed", FeatureValue::Scalar(1.0));
        t.set_feature("speed", FeatureValue::Scalar(2.0));

        assert_eq!(t.features().len(), 1);
        assert_eq!(t.feature("speed"), Some(&FeatureValue::Scalar(2.0)));
    }

    #[test]
    fn labels_append_with_commas() {
        let mut t = line(2).with_label("FREE");
        t.append_label("D_0.0902");
        assert_eq!(t.label(), "FREE,D_0.0902");

        let mut blank = line(2);
        blank.append_label("ACTIVE");
        assert_eq!(blank.label(), "ACTIVE");
    }

    #[test]
    fn steps_are_consecutive_differences() {
        let t = line(4);
        let steps: Vec<_> = t.steps().collect();
        assert_eq!(steps.len(), 3);
        for step in steps {
            assert_relative_eq!(step.x, 1.0);
        }
    }
}
