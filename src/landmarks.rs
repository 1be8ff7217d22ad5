//! Facial landmark types and the landmark source abstraction.

use crate::Result;
use opencv::core::Mat;

/// A facial keypoint in frame-normalized coordinates
///
/// `x` and `y` are fractions of the frame width and height; values outside
/// `[0, 1]` are legal for partially visible faces. `z` is a relative depth on
/// roughly the same scale as `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    /// Create a landmark
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Ordered landmarks of one detected face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    /// Wrap a landmark vector
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Number of landmarks
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether the set has no landmarks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Landmark at a topology index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Iterate landmarks in topology order
    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.landmarks.iter()
    }

    /// Keep only the first `len` landmarks
    pub fn truncate(&mut self, len: usize) {
        self.landmarks.truncate(len);
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.landmarks.iter()
    }
}

/// Anything that turns an image into per-face landmark sets
pub trait LandmarkSource {
    /// Find faces in an RGB image and return one landmark set per face
    ///
    /// An image without faces yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn process(&mut self, rgb_image: &Mat) -> Result<Vec<LandmarkSet>>;

    /// Get source name
    fn name(&self) -> &str;
}
