//! Image encoding.
//!
//! This module provides:
//! - JPEG, lossy WebP and PNG encoders over RGB pixel buffers
//! - [`Encoder`], the seam quality search is written against
//! - [`RasterEncoder`], the production implementation of that seam
//!
//! # Examples
//!
//! ```ignore
//! use pixtool_core::encode::{Encoder, OutputFormat, RasterEncoder};
//!
//! let image = pixtool_core::DecodedImage::filled(100, 100, [128, 128, 128]);
//! let bytes = RasterEncoder.encode(&image, OutputFormat::Jpeg, 0.9).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod jpeg;
mod png;
mod types;
mod webp;

pub use self::jpeg::encode_jpeg;
pub use self::png::encode_png;
pub use self::types::{quality_to_percent, EncodeError, OutputFormat};
pub use self::webp::encode_webp;

use crate::decode::DecodedImage;

/// Encodes a raster surface at a normalized quality.
///
/// `quality` is in (0, 1]; higher means larger output and less loss. Formats
/// without a quality knob ignore it. Implementations should be deterministic:
/// the same surface, format and quality give the same bytes.
pub trait Encoder {
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError>;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(image, format, quality)
    }
}

/// Encoder backed by the `image` and `webp` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterEncoder;

impl Encoder for RasterEncoder {
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        let percent = quality_to_percent(quality);
        match format {
            OutputFormat::Jpeg => encode_jpeg(&image.pixels, image.width, image.height, percent),
            OutputFormat::Webp => encode_webp(&image.pixels, image.width, image.height, percent),
            OutputFormat::Png => encode_png(&image.pixels, image.width, image.height),
        }
    }
}
