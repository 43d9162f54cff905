use tracksim_core::Position;

use super::ObstacleScene;

/// Fraction of lattice cells whose centres are at least
/// `obstacle.radius + test_radius` away from every obstacle.
///
/// Only the cells inside each obstacle's bounding box are visited, so the
/// cost is one pass over the lattice plus the local neighbourhood of each
/// obstacle.
pub(super) fn non_interaction_fraction(
    scene: &ObstacleScene,
    test_radius: f64,
    cells_per_axis: usize,
) -> f64 {
    let active = scene.dimension().get();
    let size = scene.size();
    let n = cells_per_axis;

    let mut cell = [1.0; 3];
    let mut strides = [0usize; 3];
    let mut total = 1usize;
    for axis in 0..active {
        cell[axis] = size[axis] / n as f64;
        strides[axis] = total;
        total *= n;
    }

    let mut covered = vec![false; total];

    for obstacle in scene.obstacles() {
        let center = obstacle.center();
        let reach = obstacle.radius() + test_radius;

        let Some(ranges) = cell_ranges(center, reach, &cell, active, n) else {
            continue;
        };

        for i in ranges[0].0..=ranges[0].1 {
            for j in ranges[1].0..=ranges[1].1 {
                for k in ranges[2].0..=ranges[2].1 {
                    let index = [i, j, k];
                    let mut point = Position::zeros();
                    for axis in 0..active {
                        point[axis] = (index[axis] as f64 + 0.5) * cell[axis];
                    }
                    if (point - center).norm_squared() < reach * reach {
                        let flat = i * strides[0] + j * strides[1] + k * strides[2];
                        covered[flat] = true;
                    }
                }
            }
        }
    }

    let free = covered.iter().filter(|c| !**c).count();
    free as f64 / total as f64
}

/// Inclusive index ranges of the cells whose centres may lie within `reach`
/// of `center`, or `None` if the box misses the lattice.
///
/// Inactive axes get the single range `0..=0`.
fn cell_ranges(
    center: &Position,
    reach: f64,
    cell: &[f64; 3],
    active: usize,
    n: usize,
) -> Option<[(usize, usize); 3]> {
    let mut ranges = [(0, 0); 3];
    for axis in 0..active {
        let lo = ((center[axis] - reach) / cell[axis] - 0.5).ceil().max(0.0);
        let hi = ((center[axis] + reach) / cell[axis] - 0.5).floor();
        if hi < 0.0 || lo > hi || lo >= n as f64 {
            return None;
        }
        ranges[axis] = (lo as usize, (hi as usize).min(n - 1));
    }
    Some(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::Obstacle;

    #[test]
    fn obstacle_outside_domain_covers_nothing() {
        let mut scene = ObstacleScene::new(&[1.0, 1.0]).expect("valid size");
        scene
            .add_obstacle(Obstacle::new(Position::new(5.0, 5.0, 0.0), 0.5).expect("valid"))
            .expect("2-D obstacle");

        assert_relative_eq!(non_interaction_fraction(&scene, 0.1, 64), 1.0);
    }

    #[test]
    fn one_dimensional_coverage_is_an_interval() {
        let mut scene = ObstacleScene::new(&[10.0]).expect("valid size");
        scene
            .add_obstacle(Obstacle::new(Position::new(5.0, 0.0, 0.0), 1.0).expect("valid"))
            .expect("1-D obstacle");

        // Covers (3.5, 6.5) of 10.
        assert_relative_eq!(non_interaction_fraction(&scene, 0.5, 1000), 0.7, epsilon = 2e-3);
    }

    #[test]
    fn three_dimensional_coverage_matches_ball_volume() {
        let mut scene = ObstacleScene::new(&[1.0, 1.0, 1.0]).expect("valid size");
        scene
            .add_obstacle(Obstacle::new(Position::new(0.5, 0.5, 0.5), 0.2).expect("valid"))
            .expect("3-D obstacle");

        let expected = 1.0 - 4.0 / 3.0 * std::f64::consts::PI * 0.3_f64.powi(3);
        assert_relative_eq!(non_interaction_fraction(&scene, 0.1, 100), expected, epsilon = 3e-3);
    }

    #[test]
    fn partially_outside_obstacle_is_clipped() {
        let mut scene = ObstacleScene::new(&[1.0, 1.0]).expect("valid size");
        scene
            .add_obstacle(Obstacle::new(Position::new(0.0, 0.0, 0.0), 0.2).expect("valid"))
            .expect("2-D obstacle");

        // A quarter disk of radius 0.3 lies inside the domain.
        let expected = 1.0 - std::f64::consts::PI * 0.09 / 4.0;
        assert_relative_eq!(non_interaction_fraction(&scene, 0.1, 512), expected, epsilon = 2e-3);
    }
}
