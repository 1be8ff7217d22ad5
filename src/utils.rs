//! Utility functions for image preprocessing and region-of-interest geometry.

pub mod safe_cast;
pub mod image_conversion;

use crate::landmarks::LandmarkSet;
use opencv::core::{Rect, Rect2f};
use safe_cast::f32_to_i32_clamp;

/// Square crop region around a face box, expanded and clamped to the frame
///
/// The square is centered on `bbox`, has side `max(width, height) * scale`,
/// and is shifted (not shrunk) to stay inside the frame unless it is larger
/// than the frame itself. Returns `None` for degenerate boxes or frames.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Frame dimensions are far below f32 precision limits
pub fn square_roi(bbox: Rect2f, scale: f32, frame_width: i32, frame_height: i32) -> Option<Rect> {
    if frame_width <= 0 || frame_height <= 0 || !(bbox.width > 0.0 && bbox.height > 0.0) {
        return None;
    }

    let max_side = frame_width.min(frame_height);
    let side = f32_to_i32_clamp(bbox.width.max(bbox.height) * scale, 1, max_side);

    let center_x = bbox.x + bbox.width / 2.0;
    let center_y = bbox.y + bbox.height / 2.0;
    let half = side as f32 / 2.0;

    let x = f32_to_i32_clamp(center_x - half, 0, frame_width - side);
    let y = f32_to_i32_clamp(center_y - half, 0, frame_height - side);

    Some(Rect::new(x, y, side, side))
}

/// Pixel bounding box of a landmark set on a frame
#[must_use]
#[allow(clippy::cast_precision_loss)] // Frame dimensions are far below f32 precision limits
pub fn landmark_bounds(landmarks: &LandmarkSet, frame_width: i32, frame_height: i32) -> Option<Rect2f> {
    let mut iter = landmarks.iter().filter(|lm| lm.x.is_finite() && lm.y.is_finite());
    let first = iter.next()?;

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for lm in iter {
        min_x = min_x.min(lm.x);
        min_y = min_y.min(lm.y);
        max_x = max_x.max(lm.x);
        max_y = max_y.max(lm.y);
    }

    let width = frame_width as f32;
    let height = frame_height as f32;
    Some(Rect2f::new(
        min_x * width,
        min_y * height,
        (max_x - min_x) * width,
        (max_y - min_y) * height,
    ))
}

/// Intersection over union of two boxes
#[must_use]
pub fn iou(a: Rect2f, b: Rect2f) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let union = a.width * a.height + b.width * b.height - inter;

    if union <= 0.0 {
        0.0
    } else {
        inter / union
    }
}

/// Convert an integer rectangle to its float form
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rect_to_f32(rect: Rect) -> Rect2f {
    Rect2f::new(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
}
