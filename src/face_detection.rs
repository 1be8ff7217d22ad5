//! Short-range face detector with SSD anchor decoding.

use crate::{
    constants::{
        DETECTOR_BOX_VALUES, DETECTOR_INPUT_SIZE, DETECTOR_NMS_THRESHOLD, DETECTOR_NORMALIZATION_OFFSET,
        DETECTOR_NORMALIZATION_SCALE, DETECTOR_NUM_ANCHORS, DETECTOR_SCORE_CLIP,
    },
    inference::OnnxModel,
    utils::{
        image_conversion::{letterbox, mat_to_tensor},
        iou,
    },
    Error, Result,
};
use opencv::core::{Mat, Rect2f};
use std::path::Path;

/// Anchor strides of the short-range detector, one entry per feature layer
const ANCHOR_STRIDES: [i32; 4] = [8, 16, 16, 16];

/// Anchors generated per grid cell by each feature layer
const ANCHORS_PER_LAYER: usize = 2;

/// Face detection result
#[derive(Debug, Clone)]
pub struct FaceDetection {
    /// Bounding box in frame pixels
    pub bbox: Rect2f,
    /// Confidence score in `[0, 1]`
    pub score: f32,
}

/// Anchor center in normalized input coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Short-range `BlazeFace` detector using `ONNX` Runtime
pub struct FaceDetector {
    model: OnnxModel,
    input_size: i32,
    anchors: Vec<Anchor>,
    min_confidence: f32,
    max_faces: usize,
}

impl FaceDetector {
    /// Create a new face detector from an ONNX model file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded.
    pub fn new<P: AsRef<Path>>(model_path: P, min_confidence: f32, max_faces: usize) -> Result<Self> {
        let model = OnnxModel::load("face_detector", model_path)?;
        let input_size = model.input_side_or(DETECTOR_INPUT_SIZE);
        let anchors = generate_anchors(input_size);

        log::info!(
            "Face detector ready: {}x{} input, {} anchors, min confidence {:.2}",
            input_size,
            input_size,
            anchors.len(),
            min_confidence
        );

        Ok(Self {
            model,
            input_size,
            anchors,
            min_confidence,
            max_faces,
        })
    }

    /// Detect faces in an RGB image
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails, or if the model
    /// outputs do not match the anchor layout.
    #[allow(clippy::cast_precision_loss)]
    pub fn detect(&self, rgb_image: &Mat) -> Result<Vec<FaceDetection>> {
        let (canvas, det_scale) = letterbox(rgb_image, self.input_size)?;
        let tensor = mat_to_tensor(
            &canvas,
            DETECTOR_NORMALIZATION_SCALE,
            DETECTOR_NORMALIZATION_OFFSET,
            self.model.input_layout(),
        )?;

        let outputs = self.model.run(tensor)?;
        let (boxes, scores) = split_outputs(&outputs, self.anchors.len())?;

        let candidates = decode_detections(
            boxes,
            scores,
            &self.anchors,
            self.input_size,
            self.min_confidence,
            self.input_size as f32 / det_scale,
        );
        let detections = non_max_suppression(candidates, DETECTOR_NMS_THRESHOLD, self.max_faces);

        log::debug!("Detected {} face(s)", detections.len());
        Ok(detections)
    }
}

/// Generate anchor centers for a square input
///
/// Consecutive layers sharing a stride are merged onto one grid, each
/// contributing its anchors per cell. Anchors have a fixed unit size, so only
/// centers are kept.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_anchors(input_size: i32) -> Vec<Anchor> {
    let mut anchors = Vec::with_capacity(DETECTOR_NUM_ANCHORS);
    let mut layer = 0;

    while layer < ANCHOR_STRIDES.len() {
        let stride = ANCHOR_STRIDES[layer];
        let mut per_cell = 0;
        while layer < ANCHOR_STRIDES.len() && ANCHOR_STRIDES[layer] == stride {
            per_cell += ANCHORS_PER_LAYER;
            layer += 1;
        }

        let grid = (input_size + stride - 1) / stride;
        for y in 0..grid {
            for x in 0..grid {
                let anchor = Anchor {
                    x: (x as f32 + 0.5) / grid as f32,
                    y: (y as f32 + 0.5) / grid as f32,
                };
                anchors.extend(std::iter::repeat(anchor).take(per_cell));
            }
        }
    }

    anchors
}

/// Pick the box regressor and score outputs by size
fn split_outputs(outputs: &[Vec<f32>], num_anchors: usize) -> Result<(&[f32], &[f32])> {
    let boxes = outputs
        .iter()
        .find(|o| o.len() == num_anchors * DETECTOR_BOX_VALUES)
        .ok_or_else(|| {
            Error::ModelOutputError(format!(
                "No box output with {} values (outputs: {:?})",
                num_anchors * DETECTOR_BOX_VALUES,
                outputs.iter().map(Vec::len).collect::<Vec<_>>()
            ))
        })?;
    let scores = outputs
        .iter()
        .find(|o| o.len() == num_anchors)
        .ok_or_else(|| Error::ModelOutputError(format!("No score output with {num_anchors} values")))?;

    Ok((boxes, scores))
}

/// Logistic function with the raw score clipped first
#[must_use]
pub fn score_sigmoid(raw: f32) -> f32 {
    let clipped = raw.clamp(-DETECTOR_SCORE_CLIP, DETECTOR_SCORE_CLIP);
    1.0 / (1.0 + (-clipped).exp())
}

/// Decode raw anchor regressions into frame-space detections
///
/// `boxes` holds 16 values per anchor: center offset, size, then six keypoint
/// offsets, all in pixels of an `input_size` square input. `frame_scale`
/// maps a normalized input coordinate to frame pixels. Anchors scoring below
/// `min_confidence` are dropped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn decode_detections(
    boxes: &[f32],
    scores: &[f32],
    anchors: &[Anchor],
    input_size: i32,
    min_confidence: f32,
    frame_scale: f32,
) -> Vec<FaceDetection> {
    let input_scale = input_size as f32;

    anchors
        .iter()
        .zip(scores)
        .zip(boxes.chunks_exact(DETECTOR_BOX_VALUES))
        .filter_map(|((anchor, &raw_score), raw)| {
            let score = score_sigmoid(raw_score);
            if score < min_confidence {
                return None;
            }

            let cx = raw[0] / input_scale + anchor.x;
            let cy = raw[1] / input_scale + anchor.y;
            let w = raw[2] / input_scale;
            let h = raw[3] / input_scale;

            let bbox = Rect2f::new(
                (cx - w / 2.0) * frame_scale,
                (cy - h / 2.0) * frame_scale,
                w * frame_scale,
                h * frame_scale,
            );

            Some(FaceDetection { bbox, score })
        })
        .collect()
}

/// Greedy non-maximum suppression, highest score first
#[must_use]
pub fn non_max_suppression(mut candidates: Vec<FaceDetection>, iou_threshold: f32, max_faces: usize) -> Vec<FaceDetection> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut kept: Vec<FaceDetection> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_faces {
            break;
        }
        if kept.iter().all(|k| iou(k.bbox, candidate.bbox) <= iou_threshold) {
            kept.push(candidate);
        }
    }

    kept
}
