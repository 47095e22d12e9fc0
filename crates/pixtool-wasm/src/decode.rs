//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG, PNG or WebP upload, honoring EXIF orientation
//! - [`resize`] - Resize an image to exact dimensions
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize } from '@pixtool/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const thumb = resize(image, 320, 240, 2); // Lanczos3 filter
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use pixtool_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an uploaded image from bytes.
///
/// The format is sniffed from the content, not the file name. JPEG EXIF
/// orientation is applied and transparent pixels are flattened onto white.
///
/// # Errors
///
/// Returns an error if the bytes are empty, not a supported format, or
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to exact dimensions, ignoring aspect ratio.
///
/// `filter`: 0=Nearest, 1=Bilinear, 2=Lanczos3 (default for unknown values).
///
/// # Errors
///
/// Returns an error if width or height is zero, or if the pixel buffer does
/// not match the image dimensions.
#[wasm_bindgen]
pub fn resize(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    let decoded = image.to_decoded()?;

    decode::resize(&decoded, width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
