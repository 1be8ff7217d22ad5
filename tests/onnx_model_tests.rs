//! Tests for ONNX model loading and inference

use face_expression_tracker::{
    config::{Config, LandmarkConfig, ModelConfig},
    constants::{NUM_FACE_MESH_LANDMARKS, NUM_REFINED_LANDMARKS},
    face_detection::FaceDetector,
    face_mesh::{FaceMeshModel, FaceMeshPipeline},
    landmarks::LandmarkSource,
    Error, Result,
};
use opencv::core::{Mat, Rect, Scalar, CV_8UC3};
use std::path::Path;

fn gray_rgb(rows: i32, cols: i32) -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(
        rows,
        cols,
        CV_8UC3,
        Scalar::new(128.0, 128.0, 128.0, 0.0),
    )?)
}

#[test]
fn test_missing_model_file_is_model_error() {
    let result = FaceDetector::new("assets/missing_detector.onnx", 0.7, 1);
    assert!(matches!(result, Err(Error::ModelError(_))));

    let result = FaceMeshModel::new("assets/missing_mesh.onnx");
    assert!(matches!(result, Err(Error::ModelError(_))));
}

#[test]
fn test_pipeline_requires_both_models() {
    let models = ModelConfig {
        face_detector: "assets/missing_detector.onnx".into(),
        face_mesh: "assets/missing_mesh.onnx".into(),
    };
    assert!(FaceMeshPipeline::new(&models, LandmarkConfig::default()).is_err());
}

#[test]
#[ignore = "Requires ONNX models"]
fn test_load_face_detector_model() -> Result<()> {
    let model_path = "assets/face_detection_short_range.onnx";
    assert!(Path::new(model_path).exists(), "Face detector model not found");

    let _detector = FaceDetector::new(model_path, 0.7, 1)?;

    Ok(())
}

#[test]
#[ignore = "Requires ONNX models"]
fn test_face_detection_on_blank_image() -> Result<()> {
    let detector = FaceDetector::new("assets/face_detection_short_range.onnx", 0.7, 1)?;

    let faces = detector.detect(&gray_rgb(480, 640)?)?;
    assert!(faces.is_empty(), "Uniform image should contain no faces");

    Ok(())
}

#[test]
#[ignore = "Requires ONNX models"]
fn test_face_mesh_output_shape() -> Result<()> {
    let mesh = FaceMeshModel::new("assets/face_landmark.onnx")?;

    let output = mesh.infer(&gray_rgb(480, 640)?, Rect::new(160, 80, 320, 320))?;

    assert!(
        output.landmarks.len() == NUM_FACE_MESH_LANDMARKS || output.landmarks.len() == NUM_REFINED_LANDMARKS,
        "Unexpected landmark count {}",
        output.landmarks.len()
    );
    assert!((0.0..=1.0).contains(&output.presence));

    Ok(())
}

#[test]
#[ignore = "Requires ONNX models"]
fn test_pipeline_without_face_returns_empty() -> Result<()> {
    let config = Config::default();
    let mut pipeline = FaceMeshPipeline::new(&config.models, config.landmarks)?;

    let faces = pipeline.process(&gray_rgb(480, 640)?)?;

    assert!(faces.is_empty());
    assert_eq!(pipeline.tracked_faces(), 0);

    Ok(())
}
