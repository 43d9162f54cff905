use tracksim_core::{Dimension, Observer, Position, RandomSource, Trajectory};

use crate::{
    Action, DiffusionParams, Event, ObstacleScene, ParamError, RejectionConfig, SimulationError,
    Simulator, walk::walk,
};

/// Brownian motion hindered by the immobile obstacles of a scene.
///
/// Steps whose destination collides with an obstacle or leaves the scene are
/// rejected and re-sampled. The scene is borrowed for the simulator's
/// lifetime, so it cannot change while trajectories are generated.
#[derive(Debug, Clone, Copy)]
pub struct AnomalousDiffusion<'s> {
    params: DiffusionParams,
    scene: &'s ObstacleScene,
    start: Position,
    rejection: RejectionConfig,
}

impl<'s> AnomalousDiffusion<'s> {
    /// Creates an anomalous simulator walking through `scene` from `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene's dimension differs from the parameters'
    /// dimension, or if `start` collides with an obstacle or lies outside the
    /// scene.
    pub fn new(
        params: DiffusionParams,
        scene: &'s ObstacleScene,
        start: Position,
    ) -> Result<Self, ParamError> {
        if scene.dimension() != params.dimension() {
            return Err(ParamError::new(
                "scene",
                "dimension differs from the simulation dimension",
            ));
        }
        if start.iter().skip(params.dimension().get()).any(|c| *c != 0.0) {
            return Err(ParamError::new(
                "start",
                "has a component beyond the simulation dimension",
            ));
        }
        if scene.check_collision(&start) {
            return Err(ParamError::new(
                "start",
                "collides with an obstacle or lies outside the scene",
            ));
        }

        Ok(Self {
            params,
            scene,
            start,
            rejection: RejectionConfig::default(),
        })
    }

    /// Replaces the rejection-sampling bounds.
    #[must_use]
    pub fn with_rejection(mut self, rejection: RejectionConfig) -> Self {
        self.rejection = rejection;
        self
    }

    #[must_use]
    pub fn scene(&self) -> &'s ObstacleScene {
        self.scene
    }

    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub fn params(&self) -> &DiffusionParams {
        &self.params
    }
}

impl Simulator for AnomalousDiffusion<'_> {
    fn dimension(&self) -> Dimension {
        self.params.dimension()
    }

    fn steps(&self) -> usize {
        self.params.steps()
    }

    fn simulate_observed<Obs>(
        &self,
        rng: &mut RandomSource,
        observer: Obs,
    ) -> Result<Trajectory, SimulationError>
    where
        Obs: Observer<Event, Action>,
    {
        let scene = self.scene;
        walk(
            &self.params,
            self.start,
            &self.rejection,
            rng,
            observer,
            |p| !scene.check_collision(p),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Obstacle;

    fn scene_with_ring() -> ObstacleScene {
        // A 10 x 10 box with a ring of obstacles around its centre.
        let mut scene = ObstacleScene::new(&[10.0, 10.0]).expect("valid size");
        for i in 0..12 {
            let angle = f64::from(i) * std::f64::consts::TAU / 12.0;
            let center = Position::new(5.0 + 3.0 * angle.cos(), 5.0 + 3.0 * angle.sin(), 0.0);
            scene
                .add_obstacle(Obstacle::new(center, 0.6).expect("valid obstacle"))
                .expect("matching dimension");
        }
        scene
    }

    #[test]
    fn never_collides_or_leaves_the_scene() {
        let scene = scene_with_ring();
        let params = DiffusionParams::new(0.05, 1.0, Dimension::Two, 500).expect("valid");
        let sim = AnomalousDiffusion::new(params, &scene, Position::new(5.0, 5.0, 0.0))
            .expect("valid start");
        let mut rng = RandomSource::from_seed(11);

        for _ in 0..10 {
            let t = sim.simulate(&mut rng).expect("anomalous");
            assert_eq!(t.len(), 501);
            assert_eq!(t.positions()[0], Position::new(5.0, 5.0, 0.0));
            assert!(t.positions().iter().all(|p| !scene.check_collision(p)));
        }
    }

    #[test]
    fn rejects_colliding_start() {
        let scene = scene_with_ring();
        let params = DiffusionParams::new(1.0, 1.0, Dimension::Two, 10).expect("valid");

        let on_obstacle = Position::new(8.0, 5.0, 0.0);
        assert!(AnomalousDiffusion::new(params, &scene, on_obstacle).is_err());

        let outside = Position::new(-1.0, 5.0, 0.0);
        assert!(AnomalousDiffusion::new(params, &scene, outside).is_err());
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let scene = scene_with_ring();
        let params = DiffusionParams::new(1.0, 1.0, Dimension::Three, 10).expect("valid");

        let result = AnomalousDiffusion::new(params, &scene, Position::new(5.0, 5.0, 0.0));

        assert_eq!(result.map(|_| ()).unwrap_err().name, "scene");
    }
}
