//! Lossy WebP encoding through libwebp.
//!
//! The `image` crate only writes lossless WebP, which has no quality knob, so
//! lossy output goes through the `webp` crate. Builds without the `webp`
//! feature report [`EncodeError::UnsupportedFormat`].

use super::types::validate_rgb;
use super::{EncodeError, OutputFormat};

/// Encode RGB pixel data to lossy WebP bytes.
///
/// `quality` is on the 1-100 scale, like [`super::encode_jpeg`].
#[cfg(feature = "webp")]
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;

    let quality = f32::from(quality.clamp(1, 100));
    let memory = webp::Encoder::from_rgb(pixels, width, height)
        .encode_simple(false, quality)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Webp,
            message: format!("{e:?}"),
        })?;

    Ok(memory.to_vec())
}

#[cfg(not(feature = "webp"))]
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    _quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;
    Err(EncodeError::UnsupportedFormat(OutputFormat::Webp))
}
