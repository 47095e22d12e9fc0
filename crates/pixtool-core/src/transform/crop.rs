//! Cropping: normalized rectangles, pixel rectangles and fixed aspect ratios.
//!
//! # Coordinate System
//!
//! - (0.0, 0.0) = top-left corner, (1.0, 1.0) = bottom-right corner
//! - normalized width/height are relative to the source dimensions
//! - pixel rectangles are clamped to the image bounds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{check_source, TransformError};
use crate::decode::DecodedImage;

/// Apply crop to an image using normalized coordinates.
///
/// Coordinates outside `[0, 1]` are clamped, the output is at least 1x1, and
/// a full crop `(0, 0, 1, 1)` returns a copy of the source.
///
/// # Errors
///
/// Returns `TransformError::EmptyImage` or `TransformError::InvalidBuffer`
/// for sources with no usable pixels.
pub fn apply_crop(
    image: &DecodedImage,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Result<DecodedImage, TransformError> {
    check_source(image)?;
    if left <= 0.0 && top <= 0.0 && width >= 1.0 && height >= 1.0 {
        return Ok(image.clone());
    }

    let src_w = image.width as f64;
    let src_h = image.height as f64;

    let px_left = (left.clamp(0.0, 1.0) * src_w).round() as u32;
    let px_top = (top.clamp(0.0, 1.0) * src_h).round() as u32;
    let px_width = (width.clamp(0.0, 1.0) * src_w).round() as u32;
    let px_height = (height.clamp(0.0, 1.0) * src_h).round() as u32;

    Ok(crop_region(image, px_left, px_top, px_width, px_height))
}

/// Crop a pixel rectangle, clamped to the image. The output is at least 1x1.
///
/// # Errors
///
/// Same as [`apply_crop`].
pub fn crop_pixels(
    image: &DecodedImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<DecodedImage, TransformError> {
    check_source(image)?;
    Ok(crop_region(image, x, y, width, height))
}

/// Crop on a source already known to be non-empty with a matching buffer.
pub(crate) fn crop_region(
    image: &DecodedImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> DecodedImage {
    let left = x.min(image.width.saturating_sub(1));
    let top = y.min(image.height.saturating_sub(1));
    let right = left.saturating_add(width).min(image.width);
    let bottom = top.saturating_add(height).min(image.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    if left == 0 && top == 0 && out_width == image.width && out_height == image.height {
        return image.clone();
    }

    let src_stride = image.width as usize * 3;
    let row_len = out_width as usize * 3;
    let mut pixels = Vec::with_capacity(row_len * out_height as usize);

    for row in top..top + out_height {
        let start = row as usize * src_stride + left as usize * 3;
        pixels.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    DecodedImage::new(out_width, out_height, pixels)
}

/// Crop aspect ratio, as offered by the cropper ("free", "1:1", "16:9", ...).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AspectRatio {
    /// No constraint.
    #[default]
    Free,
    /// Width over height, e.g. 16:9.
    Fixed { width: u32, height: u32 },
}

impl AspectRatio {
    /// Width divided by height, or `None` for [`AspectRatio::Free`].
    pub fn ratio(self) -> Option<f64> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Fixed { width, height } => Some(width as f64 / height as f64),
        }
    }
}

impl FromStr for AspectRatio {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("free") || s.is_empty() {
            return Ok(AspectRatio::Free);
        }

        let invalid = || TransformError::InvalidAspectRatio(s.to_string());
        let (w, h) = s.split_once(':').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(AspectRatio::Fixed { width, height })
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatio::Free => f.write_str("free"),
            AspectRatio::Fixed { width, height } => write!(f, "{width}:{height}"),
        }
    }
}

/// Largest centered region of `image` with the given aspect ratio.
///
/// [`AspectRatio::Free`] returns the image unchanged.
///
/// # Errors
///
/// Same as [`apply_crop`].
pub fn crop_to_aspect(
    image: &DecodedImage,
    aspect: AspectRatio,
) -> Result<DecodedImage, TransformError> {
    check_source(image)?;
    let Some(ratio) = aspect.ratio() else {
        return Ok(image.clone());
    };

    let (width, height) = centered_aspect_size(image.width, image.height, ratio);
    let x = image.width.saturating_sub(width) / 2;
    let y = image.height.saturating_sub(height) / 2;

    Ok(crop_region(image, x, y, width, height))
}

/// Size of the largest `ratio` rectangle that fits in `src_w` x `src_h`.
pub(crate) fn centered_aspect_size(src_w: u32, src_h: u32, ratio: f64) -> (u32, u32) {
    let src_ratio = src_w as f64 / src_h.max(1) as f64;

    if src_ratio > ratio {
        let width = (src_h as f64 * ratio).round() as u32;
        (width.clamp(1, src_w.max(1)), src_h)
    } else {
        let height = (src_w as f64 / ratio).round() as u32;
        (src_w, height.clamp(1, src_h.max(1)))
    }
}
