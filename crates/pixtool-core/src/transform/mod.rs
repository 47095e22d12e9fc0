//! Geometry operations applied before encoding: resize-with-fit and cropping.
//!
//! # Coordinate System
//!
//! - Crop coordinates are either normalized (0.0 to 1.0) or pixel rectangles
//! - Origin is top-left corner
//! - Areas of the output canvas not covered by the image are white

mod crop;
mod fit;

use thiserror::Error;

use crate::decode::{DecodeError, DecodedImage};

pub use crop::{apply_crop, crop_pixels, crop_to_aspect, AspectRatio};
pub use fit::{
    apply_fit, compute_target_dimensions, resize_with_options, FitMode, ResizeOptions, BACKGROUND,
};

/// Longest output edge a transform will allocate.
pub const MAX_EDGE: u32 = 32_767;

/// Largest output area a transform will allocate (16384 x 16384).
pub const MAX_PIXELS: u64 = 268_435_456;

/// Errors from transform operations.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Aspect ratio string is neither "free" nor "W:H" with non-zero integers.
    #[error("Invalid aspect ratio '{0}': expected \"free\" or \"W:H\"")]
    InvalidAspectRatio(String),

    /// Source image has no pixels.
    #[error("Cannot transform an empty image")]
    EmptyImage,

    /// Pixel buffer length does not match the dimensions.
    #[error("Pixel buffer does not match {width}x{height} RGB")]
    InvalidBuffer { width: u32, height: u32 },

    /// Requested output exceeds [`MAX_EDGE`] or [`MAX_PIXELS`].
    #[error("Output {width}x{height} is too large")]
    DimensionsTooLarge { width: u32, height: u32 },

    /// Resampling failed.
    #[error(transparent)]
    Resize(#[from] DecodeError),
}

/// Reject empty sources and buffers that disagree with their dimensions.
pub(crate) fn check_source(image: &DecodedImage) -> Result<(), TransformError> {
    if image.is_empty() {
        return Err(TransformError::EmptyImage);
    }
    if !image.has_valid_buffer() {
        return Err(TransformError::InvalidBuffer {
            width: image.width,
            height: image.height,
        });
    }
    Ok(())
}

/// Reject outputs too large to allocate.
pub(crate) fn check_output(width: u32, height: u32) -> Result<(), TransformError> {
    if width > MAX_EDGE || height > MAX_EDGE || u64::from(width) * u64::from(height) > MAX_PIXELS
    {
        return Err(TransformError::DimensionsTooLarge { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_source() {
        assert!(check_source(&DecodedImage::filled(2, 2, [0, 0, 0])).is_ok());
        assert!(matches!(
            check_source(&DecodedImage::new(0, 0, vec![])),
            Err(TransformError::EmptyImage)
        ));

        let short = DecodedImage {
            width: 3,
            height: 3,
            pixels: vec![0u8; 5],
        };
        assert!(matches!(
            check_source(&short),
            Err(TransformError::InvalidBuffer { width: 3, height: 3 })
        ));
    }

    #[test]
    fn test_check_output_limits() {
        assert!(check_output(MAX_EDGE, 1).is_ok());
        assert!(check_output(16_384, 16_384).is_ok());
        assert!(check_output(MAX_EDGE + 1, 1).is_err());
        assert!(matches!(
            check_output(20_000, 20_000),
            Err(TransformError::DimensionsTooLarge { .. })
        ));
    }
}
