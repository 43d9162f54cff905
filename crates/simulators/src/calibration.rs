use crate::params::{ParamError, non_negative, positive};

/// Returns the radius within which a particle stays with probability
/// `1 − prob_non_interaction` over `duration` seconds.
///
/// Computes `√(−ln(1 − p)·4·D·T)`. Confinement radii and the test radius used
/// to calibrate obstacle scenes both use this, which keeps the escape (or
/// interaction) probability roughly constant across track lengths.
///
/// # Errors
///
/// Returns an error if `prob_non_interaction` is outside `(0, 1)`, the
/// diffusion coefficient is negative or non-finite, or the duration is not
/// finite and positive.
pub fn interaction_radius(
    prob_non_interaction: f64,
    diffusion_coefficient: f64,
    duration: f64,
) -> Result<f64, ParamError> {
    if !(prob_non_interaction > 0.0 && prob_non_interaction < 1.0) {
        return Err(ParamError::new(
            "prob_non_interaction",
            "must lie strictly between 0 and 1",
        ));
    }
    let diffusion_coefficient = non_negative("diffusion_coefficient", diffusion_coefficient)?;
    let duration = positive("duration", duration)?;

    Ok((-(1.0 - prob_non_interaction).ln() * 4.0 * diffusion_coefficient * duration).sqrt())
}
