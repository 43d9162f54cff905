use tracksim_core::{Position, RandomSource};

use super::{ObstacleScene, SceneError};
use crate::params::{ParamError, non_negative};

/// Draws a collision-free start position at least `margin` from every edge.
///
/// Candidates are uniform in the shrunken box (x first, then y, then z) and
/// redrawn while they collide with an obstacle.
///
/// # Errors
///
/// Returns an error if `margin` is negative or leaves no room on some axis,
/// `max_attempts` is zero, or every candidate collides.
pub fn sample_start_position(
    scene: &ObstacleScene,
    margin: f64,
    rng: &mut RandomSource,
    max_attempts: usize,
) -> Result<Position, SceneError> {
    let margin = non_negative("margin", margin)?;
    if max_attempts == 0 {
        return Err(ParamError::new("max_attempts", "must be at least 1").into());
    }
    if scene.size().iter().any(|extent| 2.0 * margin >= *extent) {
        return Err(ParamError::new("margin", "leaves no room inside the scene").into());
    }

    for _ in 0..max_attempts {
        let mut candidate = Position::zeros();
        for (axis, extent) in scene.size().iter().enumerate() {
            candidate[axis] = rng.uniform_in(margin, extent - margin);
        }
        if !scene.check_collision(&candidate) {
            return Ok(candidate);
        }
    }

    Err(SceneError::RejectionSamplingExhausted {
        what: "start position",
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Obstacle;

    #[test]
    fn samples_inside_margin_and_free_of_obstacles() {
        let mut scene = ObstacleScene::new(&[10.0, 10.0]).expect("valid size");
        scene
            .add_obstacle(Obstacle::new(Position::new(5.0, 5.0, 0.0), 2.0).expect("valid"))
            .expect("2-D obstacle");
        let mut rng = RandomSource::from_seed(17);

        for _ in 0..200 {
            let p = sample_start_position(&scene, 1.5, &mut rng, 1_000).expect("room left");
            assert!((1.5..=8.5).contains(&p.x) && (1.5..=8.5).contains(&p.y));
            assert!(!scene.check_collision(&p));
        }
    }

    #[test]
    fn fully_blocked_scene_exhausts() {
        let mut scene = ObstacleScene::new(&[1.0, 1.0]).expect("valid size");
        scene
            .add_obstacle(Obstacle::new(Position::new(0.5, 0.5, 0.0), 2.0).expect("valid"))
            .expect("2-D obstacle");
        let mut rng = RandomSource::from_seed(0);

        let result = sample_start_position(&scene, 0.0, &mut rng, 50);

        assert_eq!(
            result,
            Err(SceneError::RejectionSamplingExhausted {
                what: "start position",
                attempts: 50
            })
        );
    }

    #[test]
    fn rejects_margin_wider_than_scene() {
        let scene = ObstacleScene::new(&[1.0, 3.0]).expect("valid size");
        let mut rng = RandomSource::from_seed(0);

        assert!(sample_start_position(&scene, 0.5, &mut rng, 10).is_err());
        assert!(sample_start_position(&scene, -0.1, &mut rng, 10).is_err());
        assert!(sample_start_position(&scene, 0.1, &mut rng, 0).is_err());
    }
}
