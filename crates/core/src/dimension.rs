use thiserror::Error;

/// The spatial dimension of a trajectory or scene.
///
/// Positions are always stored with three components; axes at or beyond
/// [`Dimension::get`] are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
pub enum Dimension {
    One,
    Two,
    Three,
}

/// Error returned when converting an unsupported integer into a [`Dimension`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("dimension must be 1, 2, or 3, got {0}")]
pub struct InvalidDimension(pub usize);

impl Dimension {
    /// Returns the number of active axes.
    #[must_use]
    pub fn get(self) -> usize {
        match self {
            Dimension::One => 1,
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

impl TryFrom<usize> for Dimension {
    type Error = InvalidDimension;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Dimension::One),
            2 => Ok(Dimension::Two),
            3 => Ok(Dimension::Three),
            other => Err(InvalidDimension(other)),
        }
    }
}

impl From<Dimension> for usize {
    fn from(dimension: Dimension) -> Self {
        dimension.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_supported_values() {
        for n in 1..=3 {
            let dim = Dimension::try_from(n).expect("supported dimension");
            assert_eq!(dim.get(), n);
            assert_eq!(usize::from(dim), n);
        }
    }

    #[test]
    fn rejects_unsupported_values() {
        assert_eq!(Dimension::try_from(0), Err(InvalidDimension(0)));
        assert_eq!(Dimension::try_from(4), Err(InvalidDimension(4)));
    }
}
