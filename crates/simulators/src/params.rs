use thiserror::Error;
use tracksim_core::Dimension;

/// A simulator or scene parameter failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid parameter `{name}`: {reason}")]
pub struct ParamError {
    pub name: &'static str,
    pub reason: &'static str,
}

impl ParamError {
    pub(crate) fn new(name: &'static str, reason: &'static str) -> Self {
        Self { name, reason }
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParamError::new(name, "must be finite and positive"))
    }
}

/// Checks that `value` is finite and non-negative.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, ParamError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParamError::new(name, "must be finite and non-negative"))
    }
}

/// Checks that `value` is finite.
pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, ParamError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParamError::new(name, "must be finite"))
    }
}

/// Parameters shared by every diffusive simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionParams {
    diffusion_coefficient: f64,
    time_step: f64,
    dimension: Dimension,
    steps: usize,
}

impl DiffusionParams {
    /// Creates validated diffusion parameters.
    ///
    /// `diffusion_coefficient` is in m²/s and `time_step` in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the diffusion coefficient is negative or
    /// non-finite, the time step is not finite and positive, or `steps` is
    /// zero.
    pub fn new(
        diffusion_coefficient: f64,
        time_step: f64,
        dimension: Dimension,
        steps: usize,
    ) -> Result<Self, ParamError> {
        let diffusion_coefficient = non_negative("diffusion_coefficient", diffusion_coefficient)?;
        let time_step = positive("time_step", time_step)?;
        if steps == 0 {
            return Err(ParamError::new("steps", "must be at least 1"));
        }

        Ok(Self {
            diffusion_coefficient,
            time_step,
            dimension,
            steps,
        })
    }

    #[must_use]
    pub fn diffusion_coefficient(&self) -> f64 {
        self.diffusion_coefficient
    }

    #[must_use]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the per-axis standard deviation of a single step, `√(2·D·Δt)`.
    #[must_use]
    pub fn step_sigma(&self) -> f64 {
        (2.0 * self.diffusion_coefficient * self.time_step).sqrt()
    }

    /// Returns the simulated duration `N·Δt` in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.steps as f64 * self.time_step
    }
}
