//! Configuration management for the face expression tracker

use crate::{
    capture::VideoSource,
    constants::{DEFAULT_CAMERA_INDEX, WINDOW_NAME},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Landmark pipeline configuration
    pub landmarks: LandmarkConfig,

    /// Video input configuration
    pub capture: CaptureConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the face detection ONNX model
    pub face_detector: PathBuf,

    /// Path to the face mesh ONNX model
    pub face_mesh: PathBuf,
}

/// Landmark pipeline parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Maximum number of faces to track
    pub max_faces: usize,

    /// Keep the refined iris landmarks when the model provides them
    pub refine_landmarks: bool,

    /// Detector score needed to start tracking a face (0.0-1.0)
    pub min_detection_confidence: f32,

    /// Mesh presence score needed to keep tracking a face (0.0-1.0)
    pub min_tracking_confidence: f32,
}

/// Video input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera index, used when no video file is set
    pub camera_index: i32,

    /// Video file to read instead of a camera
    pub video_file: Option<PathBuf>,

    /// Mirror frames horizontally before processing
    pub mirror: bool,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub window_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_detector: PathBuf::from("assets/face_detection_short_range.onnx"),
            face_mesh: PathBuf::from("assets/face_landmark.onnx"),
        }
    }
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            max_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            video_file: None,
            mirror: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_name: WINDOW_NAME.to_string(),
        }
    }
}

impl CaptureConfig {
    /// Video source selected by this configuration
    #[must_use]
    pub fn video_source(&self) -> VideoSource {
        match &self.video_file {
            Some(path) => VideoSource::File(path.clone()),
            None => VideoSource::Camera(self.camera_index),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate parameter ranges
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.landmarks.max_faces == 0 {
            return Err(Error::ConfigError("max_faces must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.landmarks.min_detection_confidence) {
            return Err(Error::ConfigError(
                "min_detection_confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.landmarks.min_tracking_confidence) {
            return Err(Error::ConfigError(
                "min_tracking_confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.capture.video_file.is_none() && self.capture.camera_index < 0 {
            return Err(Error::ConfigError("camera_index must not be negative".to_string()));
        }
        if self.display.window_name.is_empty() {
            return Err(Error::ConfigError("window_name must not be empty".to_string()));
        }

        Ok(())
    }

    /// Check that the model files exist
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing model.
    pub fn validate_models(&self) -> Result<()> {
        if !self.models.face_detector.exists() {
            return Err(Error::ConfigError(format!(
                "Face detector model not found: {}",
                self.models.face_detector.display()
            )));
        }
        if !self.models.face_mesh.exists() {
            return Err(Error::ConfigError(format!(
                "Face mesh model not found: {}",
                self.models.face_mesh.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Expression Tracker Configuration

# Model paths
models:
  face_detector: "assets/face_detection_short_range.onnx"
  face_mesh: "assets/face_landmark.onnx"

# Landmark pipeline
landmarks:
  max_faces: 1
  refine_landmarks: true
  min_detection_confidence: 0.7
  min_tracking_confidence: 0.5

# Video input
capture:
  camera_index: 0
  mirror: true

# Display settings
display:
  window_name: "Facial Feature Tracking with Expression Analysis"
"#;
