use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracksim_core::{Dimension, FeatureValue, Position, Trajectory};
use tracksim_simulators::{Obstacle, ObstacleScene, SceneError};

use crate::ExportError;

/// The persisted form of a [`Trajectory`].
///
/// Positions are truncated to the trajectory's dimension and undefined
/// features are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub label: String,
    pub dimension: Dimension,
    pub frame_interval: f64,
    pub positions: Vec<Vec<f64>>,
    pub features: BTreeMap<String, FeatureValue>,
}

impl From<&Trajectory> for TrajectoryRecord {
    fn from(trajectory: &Trajectory) -> Self {
        let active = trajectory.dimension().get();
        Self {
            label: trajectory.label().to_owned(),
            dimension: trajectory.dimension(),
            frame_interval: trajectory.frame_interval(),
            positions: trajectory
                .positions()
                .iter()
                .map(|p| truncate(p, active))
                .collect(),
            features: trajectory.features().clone(),
        }
    }
}

impl TryFrom<TrajectoryRecord> for Trajectory {
    type Error = ExportError;

    fn try_from(record: TrajectoryRecord) -> Result<Self, Self::Error> {
        let positions = record
            .positions
            .iter()
            .enumerate()
            .map(|(index, coords)| expand(coords, record.dimension, index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut trajectory = Trajectory::new(record.dimension, positions, record.frame_interval)?
            .with_label(record.label);
        for (name, value) in record.features {
            trajectory.set_feature(name, value);
        }
        Ok(trajectory)
    }
}

/// The persisted form of an [`ObstacleScene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub dimension: Dimension,
    pub size: Vec<f64>,
    pub obstacles: Vec<ObstacleRecord>,
}

/// One obstacle of a [`SceneRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub center: Vec<f64>,
    pub radius: f64,
}

impl From<&ObstacleScene> for SceneRecord {
    fn from(scene: &ObstacleScene) -> Self {
        let active = scene.dimension().get();
        Self {
            dimension: scene.dimension(),
            size: scene.size().to_vec(),
            obstacles: scene
                .obstacles()
                .iter()
                .map(|o| ObstacleRecord {
                    center: truncate(o.center(), active),
                    radius: o.radius(),
                })
                .collect(),
        }
    }
}

impl TryFrom<SceneRecord> for ObstacleScene {
    type Error = ExportError;

    fn try_from(record: SceneRecord) -> Result<Self, Self::Error> {
        if record.size.len() != record.dimension.get() {
            return Err(ExportError::Coordinates {
                index: 0,
                expected: record.dimension.get(),
                found: record.size.len(),
            });
        }

        let mut scene = ObstacleScene::new(&record.size)?;
        for (index, obstacle) in record.obstacles.iter().enumerate() {
            let center = expand(&obstacle.center, record.dimension, index)?;
            let obstacle = Obstacle::new(center, obstacle.radius).map_err(SceneError::from)?;
            scene.add_obstacle(obstacle)?;
        }
        Ok(scene)
    }
}

fn truncate(position: &Position, active: usize) -> Vec<f64> {
    position.iter().take(active).copied().collect()
}

fn expand(coords: &[f64], dimension: Dimension, index: usize) -> Result<Position, ExportError> {
    if coords.len() != dimension.get() {
        return Err(ExportError::Coordinates {
            index,
            expected: dimension.get(),
            found: coords.len(),
        });
    }
    let mut position = Position::zeros();
    for (axis, value) in coords.iter().enumerate() {
        position[axis] = *value;
    }
    Ok(position)
}
