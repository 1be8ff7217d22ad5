//! Expression classification from facial landmark geometry.
//!
//! Three coarse expressions are derived from pixel distances between a few
//! mesh landmarks and compared against fixed thresholds:
//!
//! - smile: mouth width over mouth height
//! - eyes closed: average vertical lid gap of both eyes
//! - surprise: vertical offset between two points on either eyebrow
//!
//! The thresholds are absolute pixel values, so results depend on how large
//! the face appears in the frame.

use crate::{
    constants::{EYEBROW_RAISE_THRESHOLD, EYES_CLOSED_THRESHOLD, SMILE_RATIO_THRESHOLD},
    topology::index,
    Error, Result,
};
use opencv::core::Point;

/// Expression names in display order
pub const EXPRESSION_NAMES: [&str; 3] = ["smile", "eyes_closed", "surprise"];

/// Boolean expression states for one face in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionFlags {
    pub smile: bool,
    pub eyes_closed: bool,
    pub surprise: bool,
}

impl ExpressionFlags {
    /// `(name, state)` pairs in display order
    #[must_use]
    pub fn entries(&self) -> [(&'static str, bool); 3] {
        [
            (EXPRESSION_NAMES[0], self.smile),
            (EXPRESSION_NAMES[1], self.eyes_closed),
            (EXPRESSION_NAMES[2], self.surprise),
        ]
    }

    /// Look up a state by expression name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries().into_iter().find(|(n, _)| *n == name).map(|(_, state)| state)
    }
}

/// Intermediate measurements behind the expression flags, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpressionMetrics {
    pub mouth_width: f64,
    pub mouth_height: f64,
    pub smile_ratio: f64,
    pub left_eye_height: f64,
    pub right_eye_height: f64,
    pub avg_eye_height: f64,
    pub eyebrow_left: f64,
    pub eyebrow_right: f64,
}

impl ExpressionMetrics {
    /// Measure a pixel landmark sequence in face mesh topology
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is too short for the indices read.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        if points.len() <= index::MAX_EXPRESSION_INDEX {
            return Err(Error::ModelValidationError(format!(
                "Expression analysis needs at least {} landmarks, got {}",
                index::MAX_EXPRESSION_INDEX + 1,
                points.len()
            )));
        }

        let x = |i: usize| f64::from(points[i].x);
        let y = |i: usize| f64::from(points[i].y);

        let mouth_width = x(index::MOUTH_RIGHT) - x(index::MOUTH_LEFT);
        let mouth_height = y(index::UPPER_LIP_TOP) - y(index::LOWER_LIP_BOTTOM);

        let left_eye_height = (y(index::LEFT_EYE_UPPER_LID) - y(index::LEFT_EYE_LOWER_LID)).abs();
        let right_eye_height = (y(index::RIGHT_EYE_UPPER_LID) - y(index::RIGHT_EYE_LOWER_LID)).abs();

        Ok(Self {
            mouth_width,
            mouth_height,
            smile_ratio: mouth_width / smile_denominator(mouth_height),
            left_eye_height,
            right_eye_height,
            avg_eye_height: (left_eye_height + right_eye_height) / 2.0,
            eyebrow_left: y(index::LEFT_EYEBROW_OUTER) - y(index::LEFT_EYEBROW_INNER),
            eyebrow_right: y(index::RIGHT_EYEBROW_OUTER) - y(index::RIGHT_EYEBROW_INNER),
        })
    }

    /// Apply the expression thresholds
    #[must_use]
    pub fn flags(&self) -> ExpressionFlags {
        ExpressionFlags {
            smile: self.smile_ratio > SMILE_RATIO_THRESHOLD,
            eyes_closed: self.avg_eye_height < EYES_CLOSED_THRESHOLD,
            surprise: self.eyebrow_left > EYEBROW_RAISE_THRESHOLD || self.eyebrow_right > EYEBROW_RAISE_THRESHOLD,
        }
    }
}

/// Mouth height floored at one pixel so the smile ratio is always defined
#[must_use]
pub fn smile_denominator(mouth_height: f64) -> f64 {
    mouth_height.max(1.0)
}

/// Classify expressions for one face
///
/// # Errors
///
/// Returns an error if the sequence is too short for the indices read.
pub fn classify(points: &[Point]) -> Result<ExpressionFlags> {
    Ok(ExpressionMetrics::from_points(points)?.flags())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_FACE_MESH_LANDMARKS;

    fn neutral_points() -> Vec<Point> {
        vec![Point::new(0, 0); NUM_FACE_MESH_LANDMARKS]
    }

    #[test]
    fn test_entries_order() {
        let flags = ExpressionFlags {
            smile: true,
            eyes_closed: false,
            surprise: true,
        };
        let names: Vec<&str> = flags.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["smile", "eyes_closed", "surprise"]);
        assert_eq!(flags.get("surprise"), Some(true));
        assert_eq!(flags.get("eyes_closed"), Some(false));
        assert_eq!(flags.get("frown"), None);
    }

    #[test]
    fn test_all_points_coincident() {
        // Zero-size face: lids touch, no smile, no raised brows
        let flags = classify(&neutral_points()).unwrap();
        assert!(!flags.smile);
        assert!(flags.eyes_closed);
        assert!(!flags.surprise);
    }

    #[test]
    fn test_negative_mouth_height_uses_floor() {
        let mut points = neutral_points();
        points[index::MOUTH_RIGHT].x = 90;
        points[index::UPPER_LIP_TOP].y = 100;
        points[index::LOWER_LIP_BOTTOM].y = 130;

        let metrics = ExpressionMetrics::from_points(&points).unwrap();
        assert_eq!(metrics.mouth_height, -30.0);
        assert_eq!(metrics.smile_ratio, 90.0);
        assert!(metrics.flags().smile);
    }

    #[test]
    fn test_short_sequence_rejected() {
        let points = vec![Point::new(0, 0); index::MAX_EXPRESSION_INDEX];
        assert!(matches!(classify(&points), Err(Error::ModelValidationError(_))));
    }

    #[test]
    fn test_smile_boundary_is_strict() {
        let metrics = ExpressionMetrics {
            smile_ratio: SMILE_RATIO_THRESHOLD,
            avg_eye_height: 10.0,
            ..Default::default()
        };
        assert!(!metrics.flags().smile);
    }

    #[test]
    fn test_eyes_closed_boundary_is_strict() {
        let metrics = ExpressionMetrics {
            avg_eye_height: EYES_CLOSED_THRESHOLD,
            ..Default::default()
        };
        assert!(!metrics.flags().eyes_closed);
    }
}
