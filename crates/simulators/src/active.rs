use tracksim_core::{Dimension, Observer, Position, RandomSource, Trajectory};

use crate::{
    Action, Event, ParamError, SimulationError, Simulator,
    params::{finite, non_negative, positive},
};

/// Directed motion at constant speed with a steadily rotating heading.
///
/// Step `i` moves `v·Δt` along the heading `θ₀ + i·ω·Δt` in the x–y plane.
/// One-dimensional trajectories keep only the x component; three-dimensional
/// ones have no z motion. The process is deterministic and never draws from
/// the random source.
///
/// Usually superimposed on a diffusive trajectory with [`combine`].
///
/// [`combine`]: crate::combine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTransport {
    speed: f64,
    angular_velocity: f64,
    time_step: f64,
    dimension: Dimension,
    steps: usize,
    initial_heading: f64,
}

impl ActiveTransport {
    /// Creates a drift with `speed` in m/s and `angular_velocity` in rad/s,
    /// starting along the x axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the speed is negative or non-finite, the angular
    /// velocity is non-finite, the time step is not finite and positive, or
    /// `steps` is zero.
    pub fn new(
        speed: f64,
        angular_velocity: f64,
        time_step: f64,
        dimension: Dimension,
        steps: usize,
    ) -> Result<Self, ParamError> {
        let speed = non_negative("speed", speed)?;
        let angular_velocity = finite("angular_velocity", angular_velocity)?;
        let time_step = positive("time_step", time_step)?;
        if steps == 0 {
            return Err(ParamError::new("steps", "must be at least 1"));
        }

        Ok(Self {
            speed,
            angular_velocity,
            time_step,
            dimension,
            steps,
            initial_heading: 0.0,
        })
    }

    /// Sets the heading of the first step, in radians.
    ///
    /// # Errors
    ///
    /// Returns an error if `heading` is non-finite.
    pub fn with_initial_heading(mut self, heading: f64) -> Result<Self, ParamError> {
        self.initial_heading = finite("initial_heading", heading)?;
        Ok(self)
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    #[must_use]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Returns the displacement of step `index` (0-based).
    fn displacement(&self, index: usize) -> Position {
        let heading = self.initial_heading + index as f64 * self.angular_velocity * self.time_step;
        let length = self.speed * self.time_step;

        let mut step = Position::zeros();
        step.x = length * heading.cos();
        if self.dimension.get() >= 2 {
            step.y = length * heading.sin();
        }
        step
    }
}

impl Simulator for ActiveTransport {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn steps(&self) -> usize {
        self.steps
    }

    fn simulate_observed<Obs>(
        &self,
        _rng: &mut RandomSource,
        mut observer: Obs,
    ) -> Result<Trajectory, SimulationError>
    where
        Obs: Observer<Event, Action>,
    {
        let mut positions = Vec::with_capacity(self.steps + 1);
        let mut current = Position::zeros();
        positions.push(current);

        for step in 1..=self.steps {
            current += self.displacement(step - 1);
            positions.push(current);

            let event = Event {
                step,
                position: current,
                rejections: 0,
                exhausted: false,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                return Err(SimulationError::Stopped { step });
            }
        }

        Ok(Trajectory::new(self.dimension, positions, self.time_step)?)
    }
}
