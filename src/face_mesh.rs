//! Face mesh landmark model and the tracking pipeline that feeds it.
//!
//! The pipeline follows the usual two-stage layout: a face detector finds
//! face boxes, and a mesh model regresses the full landmark set on a square
//! crop around each face. Once a face is found its landmarks define the crop
//! for the next frame, and the detector only runs again when the mesh model's
//! presence score drops below the tracking threshold.

use crate::{
    config::{LandmarkConfig, ModelConfig},
    constants::{LANDMARK_COORDS, MESH_INPUT_SIZE, MESH_NORMALIZATION_SCALE, NUM_FACE_MESH_LANDMARKS, ROI_SCALE},
    face_detection::FaceDetector,
    inference::OnnxModel,
    landmarks::{Landmark, LandmarkSet, LandmarkSource},
    utils::{
        image_conversion::{crop_and_resize, mat_to_tensor},
        iou, landmark_bounds, rect_to_f32, square_roi,
    },
    Error, Result,
};
use opencv::core::{Mat, Rect};
use opencv::prelude::*;
use std::path::Path;

/// IoU above which a new detection is considered an already tracked face
const TRACKED_FACE_IOU: f32 = 0.5;

/// Output of one mesh model run
#[derive(Debug, Clone)]
pub struct MeshOutput {
    /// Landmarks normalized to the full frame
    pub landmarks: LandmarkSet,
    /// Probability that the crop contains a face
    pub presence: f32,
}

/// Face mesh landmark regressor using `ONNX` Runtime
pub struct FaceMeshModel {
    model: OnnxModel,
    input_size: i32,
}

impl FaceMeshModel {
    /// Create a new mesh model from an ONNX model file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model = OnnxModel::load("face_mesh", model_path)?;
        let input_size = model.input_side_or(MESH_INPUT_SIZE);
        log::info!("Face mesh ready: {}x{} input", input_size, input_size);

        Ok(Self { model, input_size })
    }

    /// Run the mesh model on a square region of an RGB frame
    ///
    /// # Errors
    ///
    /// Returns an error if the region lies outside the frame, inference
    /// fails, or the outputs cannot be identified.
    pub fn infer(&self, rgb_image: &Mat, roi: Rect) -> Result<MeshOutput> {
        let crop = crop_and_resize(rgb_image, roi, self.input_size)?;
        let tensor = mat_to_tensor(&crop, MESH_NORMALIZATION_SCALE, 0.0, self.model.input_layout())?;

        let outputs = self.model.run(tensor)?;
        let (raw_landmarks, presence_logit) = split_mesh_outputs(&outputs)?;

        Ok(MeshOutput {
            landmarks: crop_to_frame(raw_landmarks, roi, rgb_image.cols(), rgb_image.rows(), self.input_size),
            presence: sigmoid(presence_logit),
        })
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Identify the landmark tensor and the presence logit among model outputs
///
/// The presence output is the single-value tensor; the landmark output is the
/// largest tensor holding whole `(x, y, z)` triples for at least the base mesh.
///
/// # Errors
///
/// Returns an error if either output is missing.
pub fn split_mesh_outputs(outputs: &[Vec<f32>]) -> Result<(&[f32], f32)> {
    let presence = outputs
        .iter()
        .find(|o| o.len() == 1)
        .map(|o| o[0])
        .ok_or_else(|| Error::ModelOutputError("Mesh model has no face presence output".to_string()))?;

    let landmarks = outputs
        .iter()
        .filter(|o| o.len() % LANDMARK_COORDS == 0 && o.len() >= NUM_FACE_MESH_LANDMARKS * LANDMARK_COORDS)
        .max_by_key(|o| o.len())
        .ok_or_else(|| {
            Error::ModelOutputError(format!(
                "Mesh model has no landmark output (outputs: {:?})",
                outputs.iter().map(Vec::len).collect::<Vec<_>>()
            ))
        })?;

    Ok((landmarks, presence))
}

/// Map crop-space mesh output to frame-normalized landmarks
///
/// `raw` holds `(x, y, z)` triples in pixels of the `input_size` model input.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Image dimensions are far below f32 precision limits
pub fn crop_to_frame(raw: &[f32], roi: Rect, frame_width: i32, frame_height: i32, input_size: i32) -> LandmarkSet {
    let to_roi = roi.width as f32 / input_size as f32;
    let frame_width = frame_width as f32;
    let frame_height = frame_height as f32;

    raw.chunks_exact(LANDMARK_COORDS)
        .map(|xyz| {
            Landmark::new(
                (roi.x as f32 + xyz[0] * to_roi) / frame_width,
                (roi.y as f32 + xyz[1] * to_roi) / frame_height,
                xyz[2] * to_roi / frame_width,
            )
        })
        .collect::<Vec<_>>()
        .into()
}

/// Detector plus mesh model with frame-to-frame region tracking
pub struct FaceMeshPipeline {
    detector: FaceDetector,
    mesh: FaceMeshModel,
    options: LandmarkConfig,
    tracked: Vec<Rect>,
}

impl FaceMeshPipeline {
    /// Load both models
    ///
    /// # Errors
    ///
    /// Returns an error if either model cannot be loaded.
    pub fn new(models: &ModelConfig, options: LandmarkConfig) -> Result<Self> {
        log::info!(
            "Initializing face mesh pipeline: max_faces={}, refine_landmarks={}, min_detection_confidence={:.2}, min_tracking_confidence={:.2}",
            options.max_faces,
            options.refine_landmarks,
            options.min_detection_confidence,
            options.min_tracking_confidence
        );

        let detector = FaceDetector::new(&models.face_detector, options.min_detection_confidence, options.max_faces)?;
        let mesh = FaceMeshModel::new(&models.face_mesh)?;

        Ok(Self {
            detector,
            mesh,
            options,
            tracked: Vec::new(),
        })
    }

    /// Number of faces currently tracked
    #[must_use]
    pub fn tracked_faces(&self) -> usize {
        self.tracked.len()
    }

    /// Regions to run the mesh on: tracked faces first, then new detections
    fn regions(&self, rgb_image: &Mat) -> Result<Vec<Rect>> {
        let mut regions = self.tracked.clone();
        if regions.len() >= self.options.max_faces {
            return Ok(regions);
        }

        let (width, height) = (rgb_image.cols(), rgb_image.rows());
        for detection in self.detector.detect(rgb_image)? {
            if regions.len() >= self.options.max_faces {
                break;
            }
            let Some(roi) = square_roi(detection.bbox, ROI_SCALE, width, height) else {
                continue;
            };
            let roi_f = rect_to_f32(roi);
            if regions.iter().all(|r| iou(rect_to_f32(*r), roi_f) < TRACKED_FACE_IOU) {
                regions.push(roi);
            }
        }

        Ok(regions)
    }
}

impl LandmarkSource for FaceMeshPipeline {
    fn process(&mut self, rgb_image: &Mat) -> Result<Vec<LandmarkSet>> {
        let (width, height) = (rgb_image.cols(), rgb_image.rows());
        let regions = self.regions(rgb_image)?;

        let mut faces = Vec::with_capacity(regions.len());
        let mut next_tracked = Vec::with_capacity(regions.len());

        for roi in regions {
            let MeshOutput { mut landmarks, presence } = self.mesh.infer(rgb_image, roi)?;

            if presence < self.options.min_tracking_confidence {
                log::debug!("Lost face at {:?} (presence {:.2})", roi, presence);
                continue;
            }

            if landmarks.len() < NUM_FACE_MESH_LANDMARKS {
                self.tracked.clear();
                return Err(Error::ModelValidationError(format!(
                    "Mesh model produced {} landmarks, expected at least {}",
                    landmarks.len(),
                    NUM_FACE_MESH_LANDMARKS
                )));
            }
            if !self.options.refine_landmarks {
                landmarks.truncate(NUM_FACE_MESH_LANDMARKS);
            }

            if let Some(next) = landmark_bounds(&landmarks, width, height)
                .and_then(|bounds| square_roi(bounds, ROI_SCALE, width, height))
            {
                next_tracked.push(next);
            }
            faces.push(landmarks);
        }

        self.tracked = next_tracked;
        Ok(faces)
    }

    fn name(&self) -> &str {
        "FaceMeshPipeline"
    }
}
