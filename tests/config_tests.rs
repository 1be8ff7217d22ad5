//! Configuration loading and validation tests

use face_expression_tracker::{
    capture::VideoSource,
    config::{Config, EXAMPLE_CONFIG},
    Error,
};
use std::path::PathBuf;

#[test]
fn test_partial_config_uses_defaults() {
    let config = Config::from_yaml_str(
        r"
landmarks:
  max_faces: 2
capture:
  mirror: false
",
    )
    .unwrap();

    assert_eq!(config.landmarks.max_faces, 2);
    assert!(config.landmarks.refine_landmarks);
    assert_eq!(config.landmarks.min_detection_confidence, 0.7);
    assert!(!config.capture.mirror);
    assert_eq!(config.capture.camera_index, 0);
    assert_eq!(config.models.face_mesh, PathBuf::from("assets/face_landmark.onnx"));
}

#[test]
fn test_empty_document_is_default() {
    let config = Config::from_yaml_str("{}").unwrap();
    assert_eq!(config.landmarks.max_faces, 1);
    assert_eq!(config.display.window_name, "Facial Feature Tracking with Expression Analysis");
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let result = Config::from_yaml_str("landmarks: [not, a, map]");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_example_config_is_valid() {
    let config = Config::from_yaml_str(EXAMPLE_CONFIG).unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_out_of_range_values() {
    let mut config = Config::default();
    config.landmarks.max_faces = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.landmarks.min_detection_confidence = 1.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.landmarks.min_tracking_confidence = -0.1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.capture.camera_index = -1;
    assert!(config.validate().is_err());

    config.capture.video_file = Some(PathBuf::from("clip.mp4"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_models_reports_missing_file() {
    let mut config = Config::default();
    config.models.face_detector = PathBuf::from("does/not/exist.onnx");

    let result = config.validate_models();
    assert!(matches!(result, Err(Error::ConfigError(msg)) if msg.contains("does/not/exist.onnx")));
}

#[test]
fn test_video_file_selects_file_source() {
    let config = Config::from_yaml_str(
        r#"
capture:
  camera_index: 3
  video_file: "recordings/session.mp4"
"#,
    )
    .unwrap();

    assert_eq!(
        config.capture.video_source(),
        VideoSource::File(PathBuf::from("recordings/session.mp4"))
    );
}

#[test]
fn test_file_round_trip() {
    let path = std::env::temp_dir().join(format!("face_expression_tracker_config_{}.yaml", std::process::id()));

    let mut config = Config::default();
    config.landmarks.max_faces = 3;
    config.landmarks.refine_landmarks = false;
    config.capture.camera_index = 2;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.landmarks.max_faces, 3);
    assert!(!loaded.landmarks.refine_landmarks);
    assert_eq!(loaded.capture.video_source(), VideoSource::Camera(2));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::from_file("no/such/config.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}
