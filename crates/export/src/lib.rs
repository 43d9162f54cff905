//! JSON export of trajectories and obstacle scenes.
//!
//! Trajectories are written as an array of [`TrajectoryRecord`]s and scenes
//! as a single [`SceneRecord`], both pretty-printed. Each `write_*` function
//! has a `*_to` counterpart that accepts any [`io::Write`], and the records
//! convert back into core types for reading results in again.

mod record;

pub use record::{ObstacleRecord, SceneRecord, TrajectoryRecord};

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracksim_core::{Trajectory, TrajectoryError};
use tracksim_simulators::{ObstacleScene, SceneError};

/// Errors that can occur while writing or reading records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot access `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("record {index} has {found} coordinates, expected {expected}")]
    Coordinates {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Writes `trajectories` to a new JSON file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_trajectories(path: impl AsRef<Path>, trajectories: &[Trajectory]) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = create(path)?;
    write_trajectories_to(BufWriter::new(file), trajectories).map_err(|e| with_path(e, path))
}

/// Writes `trajectories` as a JSON array to `writer`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_trajectories_to<W: Write>(mut writer: W, trajectories: &[Trajectory]) -> Result<(), ExportError> {
    let records: Vec<TrajectoryRecord> = trajectories.iter().map(TrajectoryRecord::from).collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Writes `scene` to a new JSON file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_scene(path: impl AsRef<Path>, scene: &ObstacleScene) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = create(path)?;
    write_scene_to(BufWriter::new(file), scene).map_err(|e| with_path(e, path))
}

/// Writes `scene` as a JSON object to `writer`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_scene_to<W: Write>(mut writer: W, scene: &ObstacleScene) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, &SceneRecord::from(scene))?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Reads trajectories previously written by [`write_trajectories`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold valid
/// trajectory records.
pub fn read_trajectories(path: impl AsRef<Path>) -> Result<Vec<Trajectory>, ExportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_owned(),
        source,
    })?;
    read_trajectories_from(BufReader::new(file))
}

/// Reads a JSON array of trajectory records from `reader`.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or a record is invalid.
pub fn read_trajectories_from<R: Read>(reader: R) -> Result<Vec<Trajectory>, ExportError> {
    let records: Vec<TrajectoryRecord> = serde_json::from_reader(reader)?;
    records.into_iter().map(Trajectory::try_from).collect()
}

/// Reads a scene from a JSON object in `reader`.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or describes an invalid
/// scene.
pub fn read_scene_from<R: Read>(reader: R) -> Result<ObstacleScene, ExportError> {
    let record: SceneRecord = serde_json::from_reader(reader)?;
    ObstacleScene::try_from(record)
}

fn create(path: &Path) -> Result<File, ExportError> {
    File::create(path).map_err(|source| ExportError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Attaches `path` to I/O failures reported through serde_json.
fn with_path(error: ExportError, path: &Path) -> ExportError {
    match error {
        ExportError::Json(e) if e.is_io() => ExportError::Io {
            path: path.to_owned(),
            source: e.into(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::{Value, json};
    use tracksim_core::{Dimension, FeatureValue, Position};
    use tracksim_simulators::Obstacle;

    fn trajectory() -> Trajectory {
        let positions = vec![
            Position::zeros(),
            Position::new(1e-7, -2e-7, 0.0),
            Position::new(3e-7, 1e-7, 0.0),
        ];
        let mut t = Trajectory::new(Dimension::Two, positions, 1.0 / 30.0)
            .expect("valid")
            .with_label("FREE,D_0.0902,dt_0.03");
        t.set_feature("aspect_ratio", FeatureValue::Scalar(1.5));
        t.set_feature("power_law", FeatureValue::Sequence(vec![1.0, 9.02e-14]));
        t.set_feature("spline_dynamics", FeatureValue::Undefined);
        t
    }

    fn to_value(trajectories: &[Trajectory]) -> Value {
        let mut buffer = Vec::new();
        write_trajectories_to(&mut buffer, trajectories).expect("in-memory write");
        serde_json::from_slice(&buffer).expect("valid JSON")
    }

    #[test]
    fn trajectory_record_layout() {
        let value = to_value(&[trajectory()]);
        let record = &value[0];

        assert_eq!(record["label"], json!("FREE,D_0.0902,dt_0.03"));
        assert_eq!(record["dimension"], json!(2));
        assert_eq!(record["positions"].as_array().map(Vec::len), Some(3));
        assert_eq!(record["positions"][1], json!([1e-7, -2e-7]));
        assert_eq!(record["features"]["aspect_ratio"], json!(1.5));
        assert_eq!(record["features"]["power_law"], json!([1.0, 9.02e-14]));
        assert_eq!(record["features"]["spline_dynamics"], Value::Null);
    }

    #[test]
    fn trajectories_read_back_unchanged() {
        let original = trajectory();
        let mut buffer = Vec::new();
        write_trajectories_to(&mut buffer, std::slice::from_ref(&original)).expect("write");

        let read = read_trajectories_from(buffer.as_slice()).expect("read");

        assert_eq!(read, vec![original]);
    }

    #[test]
    fn one_dimensional_positions_have_one_coordinate() {
        let positions = vec![Position::zeros(), Position::new(2.0, 0.0, 0.0)];
        let t = Trajectory::new(Dimension::One, positions, 1.0).expect("valid");

        let value = to_value(&[t]);
        assert_eq!(value[0]["positions"], json!([[0.0], [2.0]]));
    }

    #[test]
    fn rejects_records_with_wrong_coordinate_count() {
        let input = json!([{
            "label": "",
            "dimension": 2,
            "frame_interval": 1.0,
            "positions": [[0.0, 0.0], [1.0]],
            "features": {}
        }]);

        let result = read_trajectories_from(input.to_string().as_bytes());
        assert!(matches!(
            result,
            Err(ExportError::Coordinates {
                index: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn scene_record_layout_and_read_back() {
        let mut scene = ObstacleScene::new(&[10e-6, 10e-6]).expect("valid size");
        scene
            .add_obstacle(Obstacle::new(Position::new(2e-6, 3e-6, 0.0), 0.5e-6).expect("valid"))
            .expect("2-D obstacle");
        scene
            .add_obstacle(Obstacle::new(Position::new(7e-6, 1e-6, 0.0), 0.4e-6).expect("valid"))
            .expect("2-D obstacle");

        let mut buffer = Vec::new();
        write_scene_to(&mut buffer, &scene).expect("write");

        let value: Value = serde_json::from_slice(&buffer).expect("valid JSON");
        assert_eq!(value["size"], json!([10e-6, 10e-6]));
        assert_eq!(value["obstacles"][1]["center"], json!([7e-6, 1e-6]));
        assert_relative_eq!(value["obstacles"][0]["radius"].as_f64().expect("number"), 0.5e-6);

        let read = read_scene_from(buffer.as_slice()).expect("read");
        assert_eq!(read, scene);
    }

    #[test]
    fn writes_files_and_reports_missing_directories() {
        let dir = std::env::temp_dir().join(format!("tracksim-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("tracks.json");

        write_trajectories(&path, &[trajectory()]).expect("write file");
        assert_eq!(read_trajectories(&path).expect("read file").len(), 1);

        let missing = dir.join("missing").join("tracks.json");
        assert!(matches!(
            write_trajectories(&missing, &[]),
            Err(ExportError::Io { .. })
        ));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
