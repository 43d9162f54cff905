/// The result of a feature computation stored on a [`Trajectory`].
///
/// [`Trajectory`]: crate::Trajectory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FeatureValue {
    /// A single real number.
    Scalar(f64),
    /// An ordered sequence of real numbers, such as a per-lag curve.
    Sequence(Vec<f64>),
    /// The trajectory was too short or degenerate for this feature.
    ///
    /// Serializes as `null`.
    Undefined,
}

impl FeatureValue {
    /// Returns the scalar value, if this is a [`FeatureValue::Scalar`].
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FeatureValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the sequence, if this is a [`FeatureValue::Sequence`].
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[f64]> {
        match self {
            FeatureValue::Sequence(values) => Some(values),
            _ => None,
        }
    }

    /// Returns true if the feature could not be computed.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, FeatureValue::Undefined)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Scalar(value)
    }
}

impl From<Vec<f64>> for FeatureValue {
    fn from(values: Vec<f64>) -> Self {
        FeatureValue::Sequence(values)
    }
}
