//! Conversion of `OpenCV` images into model input tensors.

use crate::{utils::safe_cast::i32_to_usize, Error, Result};
use ndarray::Array4;
use opencv::core::{Mat, Rect, Scalar, Size, Vec3f, CV_32F, CV_8UC3};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;

/// Memory layout a model expects for its image input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[batch, height, width, channels]`
    Nhwc,
    /// `[batch, channels, height, width]`
    Nchw,
}

impl TensorLayout {
    /// Guess the layout from an input shape, treating a dimension of 3 in
    /// position 1 as channels-first
    #[must_use]
    pub fn from_dimensions(dims: &[Option<u32>]) -> Self {
        match dims {
            [_, Some(3), _, _] => Self::Nchw,
            _ => Self::Nhwc,
        }
    }

    /// `(height, width)` of a 4D input shape, if known
    #[must_use]
    pub fn spatial_size(self, dims: &[Option<u32>]) -> Option<(u32, u32)> {
        if dims.len() != 4 {
            return None;
        }
        let (h, w) = match self {
            Self::Nhwc => (dims[1], dims[2]),
            Self::Nchw => (dims[2], dims[3]),
        };
        Some((h?, w?))
    }
}

/// Resize an image into a `size x size` canvas keeping its aspect ratio
///
/// The image is placed at the top-left corner and the remainder is padded
/// with black. Returns the canvas and the factor that maps original pixels
/// to canvas pixels.
///
/// # Errors
///
/// Returns an error if the image is empty or an `OpenCV` call fails.
#[allow(clippy::cast_precision_loss)] // Image dimensions are far below f32 precision limits
#[allow(clippy::cast_possible_truncation)]
pub fn letterbox(image: &Mat, size: i32) -> Result<(Mat, f32)> {
    let width = image.cols();
    let height = image.rows();
    if width <= 0 || height <= 0 {
        return Err(Error::InvalidInput(format!("Cannot letterbox a {width}x{height} image")));
    }

    let scale = size as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * scale) as i32).clamp(1, size);
    let new_height = ((height as f32 * scale) as i32).clamp(1, size);

    let mut resized = Mat::default();
    imgproc::resize(
        image,
        &mut resized,
        Size::new(new_width, new_height),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let canvas = Mat::new_rows_cols_with_default(size, size, CV_8UC3, Scalar::all(0.0))?;
    let mut roi = Mat::roi(&canvas, Rect::new(0, 0, new_width, new_height))?;
    resized.copy_to(&mut roi)?;

    Ok((canvas, scale))
}

/// Crop a region of an image and resize it to `size x size`
///
/// # Errors
///
/// Returns an error if the region lies outside the image or an `OpenCV`
/// call fails.
pub fn crop_and_resize(image: &Mat, region: Rect, size: i32) -> Result<Mat> {
    let crop = Mat::roi(image, region)?.try_clone()?;

    let mut resized = Mat::default();
    imgproc::resize(
        &crop,
        &mut resized,
        Size::new(size, size),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    Ok(resized)
}

/// Convert an 8-bit 3-channel image into a batch-of-one float tensor
///
/// Each channel value `v` becomes `v * scale + offset`. Channel order is
/// kept as-is, so the caller decides between RGB and BGR.
///
/// # Errors
///
/// Returns an error if the image is not 3-channel or pixel access fails.
pub fn mat_to_tensor(image: &Mat, scale: f32, offset: f32, layout: TensorLayout) -> Result<Array4<f32>> {
    if image.channels() != 3 {
        return Err(Error::InvalidInput(format!(
            "Expected a 3-channel image, got {} channels",
            image.channels()
        )));
    }

    let mut float_image = Mat::default();
    image.convert_to(&mut float_image, CV_32F, f64::from(scale), f64::from(offset))?;

    let rows = i32_to_usize(float_image.rows())?;
    let cols = i32_to_usize(float_image.cols())?;

    let mut tensor = match layout {
        TensorLayout::Nhwc => Array4::<f32>::zeros((1, rows, cols, 3)),
        TensorLayout::Nchw => Array4::<f32>::zeros((1, 3, rows, cols)),
    };

    for (row, row_i32) in (0..rows).zip(0..float_image.rows()) {
        for (col, col_i32) in (0..cols).zip(0..float_image.cols()) {
            let pixel = float_image.at_2d::<Vec3f>(row_i32, col_i32)?;
            for ch in 0..3 {
                match layout {
                    TensorLayout::Nhwc => tensor[[0, row, col, ch]] = pixel[ch],
                    TensorLayout::Nchw => tensor[[0, ch, row, col]] = pixel[ch],
                }
            }
        }
    }

    Ok(tensor)
}
