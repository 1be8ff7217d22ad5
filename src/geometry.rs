//! Landmark-to-pixel conversion and feature outline drawing.

use crate::{
    constants::{EYE_BGR, FACE_OVAL_BGR, LANDMARK_RADIUS, LINE_THICKNESS, MOUTH_BGR, NOSE_BGR},
    landmarks::LandmarkSet,
    topology::{FeatureTable, EYES, FACE_OVAL, MOUTH, NOSE},
    Error, Result,
};
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{self, LINE_8},
};

/// Build an `OpenCV` color from a BGR triple
#[must_use]
pub fn bgr_scalar(bgr: (f64, f64, f64)) -> Scalar {
    Scalar::new(bgr.0, bgr.1, bgr.2, 0.0)
}

/// Convert normalized landmarks to pixel coordinates for a frame size
///
/// Each coordinate is scaled and rounded to the nearest pixel. Landmarks
/// outside `[0, 1]` map outside the frame; drawing clips them.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Pixel coordinates fit in i32 for any real frame
pub fn to_pixel_coordinates(landmarks: &LandmarkSet, width: i32, height: i32) -> Vec<Point> {
    let width = f64::from(width);
    let height = f64::from(height);

    landmarks
        .iter()
        .map(|lm| {
            Point::new(
                (f64::from(lm.x) * width).round() as i32,
                (f64::from(lm.y) * height).round() as i32,
            )
        })
        .collect()
}

/// Draw one feature outline onto a frame
///
/// Lines are drawn for every connection in table order, then a dot is drawn
/// on every point of `points`, not only on the ones the table references.
///
/// # Errors
///
/// Returns an error if a connection refers past the end of `points` or if
/// an `OpenCV` drawing call fails.
pub fn draw_feature(frame: &mut Mat, points: &[Point], table: &FeatureTable, color: Scalar) -> Result<()> {
    for &(from, to) in table.connections {
        let (Some(&start), Some(&end)) = (points.get(from), points.get(to)) else {
            return Err(Error::ModelValidationError(format!(
                "{} connection ({from}, {to}) exceeds {} landmarks",
                table.name,
                points.len()
            )));
        };
        imgproc::line(frame, start, end, color, LINE_THICKNESS, LINE_8, 0)?;
    }

    for &point in points {
        imgproc::circle(frame, point, LANDMARK_RADIUS, color, -1, LINE_8, 0)?;
    }

    Ok(())
}

/// Draw eyes, mouth, nose and face oval in their fixed colors
///
/// # Errors
///
/// Returns an error if any feature fails to draw.
pub fn draw_all_features(frame: &mut Mat, points: &[Point]) -> Result<()> {
    let styled = [
        (&EYES, EYE_BGR),
        (&MOUTH, MOUTH_BGR),
        (&NOSE, NOSE_BGR),
        (&FACE_OVAL, FACE_OVAL_BGR),
    ];

    for (table, bgr) in styled {
        draw_feature(frame, points, table, bgr_scalar(bgr))?;
    }

    Ok(())
}
