use tracksim_core::{Dimension, Observer, Position, RandomSource, Trajectory};

use crate::{Action, DiffusionParams, Event, Exhaustion, RejectionConfig, SimulationError};

/// Draws an isotropic Gaussian displacement with per-axis deviation `sigma`.
///
/// Axes are drawn in order (x, then y, then z) and only up to `dimension`.
pub(crate) fn gaussian_step(dimension: Dimension, sigma: f64, rng: &mut RandomSource) -> Position {
    let mut step = Position::zeros();
    for axis in 0..dimension.get() {
        step[axis] = sigma * rng.gaussian();
    }
    step
}

/// Runs a Gaussian random walk from `start`, re-sampling each step until
/// `accept` holds for the destination.
///
/// `accept(start)` must be true; with [`Exhaustion::StayPut`] the walk then
/// never leaves the accepted region.
pub(crate) fn walk<Obs, F>(
    params: &DiffusionParams,
    start: Position,
    rejection: &RejectionConfig,
    rng: &mut RandomSource,
    mut observer: Obs,
    accept: F,
) -> Result<Trajectory, SimulationError>
where
    Obs: Observer<Event, Action>,
    F: Fn(&Position) -> bool,
{
    let dimension = params.dimension();
    let sigma = params.step_sigma();

    let mut positions = Vec::with_capacity(params.steps() + 1);
    positions.push(start);
    let mut current = start;

    for step in 1..=params.steps() {
        let mut rejections = 0;
        let mut exhausted = false;

        let next = loop {
            let candidate = current + gaussian_step(dimension, sigma, rng);
            if accept(&candidate) {
                break candidate;
            }

            rejections += 1;
            if rejections >= rejection.max_attempts() {
                match rejection.on_exhausted() {
                    Exhaustion::StayPut => {
                        tracing::debug!(step, rejections, "rejection sampling exhausted, staying put");
                        exhausted = true;
                        break current;
                    }
                    Exhaustion::Fail => {
                        return Err(SimulationError::RejectionSamplingExhausted {
                            step,
                            attempts: rejections,
                        });
                    }
                }
            }
        };

        positions.push(next);
        current = next;

        let event = Event {
            step,
            position: next,
            rejections,
            exhausted,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Err(SimulationError::Stopped { step });
        }
    }

    Ok(Trajectory::new(dimension, positions, params.time_step())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_step_leaves_unused_axes_zero() {
        let mut rng = RandomSource::from_seed(5);
        for _ in 0..100 {
            let step = gaussian_step(Dimension::Two, 1.0, &mut rng);
            assert_eq!(step.z, 0.0);

            let step = gaussian_step(Dimension::One, 1.0, &mut rng);
            assert_eq!(step.y, 0.0);
            assert_eq!(step.z, 0.0);
        }
    }

    #[test]
    fn exhausted_steps_stay_put() {
        let params = DiffusionParams::new(1.0, 1.0, Dimension::Two, 5).expect("valid");
        let rejection = RejectionConfig::new(3, Exhaustion::StayPut).expect("valid");
        let mut rng = RandomSource::from_seed(9);

        let mut events = Vec::new();
        let observer = |event: &Event| -> Option<Action> {
            events.push(*event);
            None
        };

        // Only the start itself is acceptable.
        let t = walk(&params, Position::zeros(), &rejection, &mut rng, observer, |p| {
            p.norm() == 0.0
        })
        .expect("stay-put never fails");

        assert!(t.positions().iter().all(|p| p.norm() == 0.0));
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.exhausted && e.rejections == 3));
    }

    #[test]
    fn exhausted_steps_fail_when_configured() {
        let params = DiffusionParams::new(1.0, 1.0, Dimension::Two, 5).expect("valid");
        let rejection = RejectionConfig::new(2, Exhaustion::Fail).expect("valid");
        let mut rng = RandomSource::from_seed(9);

        let result = walk(&params, Position::zeros(), &rejection, &mut rng, (), |_| false);

        assert_eq!(
            result,
            Err(SimulationError::RejectionSamplingExhausted {
                step: 1,
                attempts: 2
            })
        );
    }

    #[test]
    fn observer_can_stop_the_walk() {
        let params = DiffusionParams::new(1.0, 1.0, Dimension::Two, 10).expect("valid");
        let mut rng = RandomSource::from_seed(9);

        let observer = |event: &Event| (event.step == 4).then_some(Action::StopEarly);
        let result = walk(
            &params,
            Position::zeros(),
            &RejectionConfig::default(),
            &mut rng,
            observer,
            |_| true,
        );

        assert_eq!(result, Err(SimulationError::Stopped { step: 4 }));
    }
}
