//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode at a fixed quality
//! - [`search_quality`] - Encode as close to a target size as possible
//!
//! # Example
//!
//! ```typescript
//! import { search_quality } from '@pixtool/wasm';
//!
//! const result = search_quality(image, 'image/jpeg', 150, 90);
//! if (result.overshoot) {
//!   showWarning(`Could not reach 150 KB, got ${result.size_kb.toFixed(1)} KB`);
//! }
//! const blob = new Blob([result.bytes()], { type: result.mime });
//! ```

use crate::types::{parse_format, JsDecodedImage, JsEncodeResult};
use pixtool_core::encode::{Encoder, RasterEncoder};
use pixtool_core::pipeline::normalized_quality;
use pixtool_core::search::{self, EncodeRequest};
use wasm_bindgen::prelude::*;

/// Encode an image at a fixed quality.
///
/// * `format` - "jpeg", "webp", "png" or a MIME type
/// * `quality` - 1-100; ignored for PNG
///
/// # Errors
///
/// Returns an error for unknown formats or if the encoder fails.
#[wasm_bindgen]
pub fn encode_image(image: &JsDecodedImage, format: &str, quality: u8) -> Result<Vec<u8>, JsValue> {
    let format = parse_format(format)?;
    RasterEncoder
        .encode(&image.to_decoded()?, format, normalized_quality(quality))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image, searching for the highest quality that fits `target_kb`.
///
/// `quality` (1-100) is the ceiling of the search. Without a target a single
/// encode at that quality is performed. PNG with a target is re-encoded as
/// JPEG; check `mime` on the result. When the target cannot be met the result
/// is the ceiling-quality encode with `overshoot` set, and a warning is logged
/// to the console.
#[wasm_bindgen]
pub fn search_quality(
    image: &JsDecodedImage,
    format: &str,
    target_kb: Option<f64>,
    quality: u8,
) -> Result<JsEncodeResult, JsValue> {
    let mut request = EncodeRequest::new(parse_format(format)?, normalized_quality(quality));
    request.target_kb = target_kb;

    let result = search::search_quality(&RasterEncoder, &image.to_decoded()?, &request)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    if result.overshoot {
        warn_overshoot(target_kb.unwrap_or_default(), result.size_kb());
    }

    Ok(result.into())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn warn_overshoot(target_kb: f64, size_kb: f64) {
    let message = format!("Could not reach {target_kb:.0} KB, encoded {size_kb:.1} KB instead");
    web_sys::console::warn_1(&JsValue::from_str(&message));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn warn_overshoot(_target_kb: f64, _size_kb: f64) {}

/// Tests for encode bindings.
///
/// Functions returning `Result<T, JsValue>` only work on wasm32 targets; the
/// underlying behavior is covered in `pixtool_core::search`.
#[cfg(test)]
mod tests {
    use super::*;
    use pixtool_core::encode::OutputFormat;

    #[test]
    fn test_raster_encoder_from_js_image() {
        let img = JsDecodedImage::new(10, 10, vec![128u8; 10 * 10 * 3]);

        let jpeg = RasterEncoder
            .encode(&img.to_decoded().unwrap(), OutputFormat::Jpeg, normalized_quality(90))
            .unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_search_result_converts() {
        let img = JsDecodedImage::new(16, 16, vec![90u8; 16 * 16 * 3]);
        let request = EncodeRequest::new(OutputFormat::Png, 0.9).with_target_kb(100.0);

        let result: JsEncodeResult =
            search::search_quality(&RasterEncoder, &img.to_decoded().unwrap(), &request)
                .unwrap()
                .into();
        assert_eq!(result.mime(), "image/jpeg");
        assert!(!result.overshoot());
    }
}
