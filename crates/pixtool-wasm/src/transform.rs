//! WASM bindings for crop and fit operations used by the cropper and resizer previews.

use crate::types::{filter_from_u8, JsDecodedImage};
use pixtool_core::transform::{self, AspectRatio, FitMode};
use wasm_bindgen::prelude::*;

/// Apply crop to an image using normalized coordinates.
///
/// (0, 0) is the top-left corner and (1, 1) the bottom-right. Out-of-range
/// values are clamped; the result is at least 1x1.
///
/// ```typescript
/// // Crop the center 50% of the image
/// const cropped = apply_crop(sourceImage, 0.25, 0.25, 0.5, 0.5);
/// ```
///
/// # Errors
///
/// Returns an error for an empty image or a pixel buffer that does not match
/// its dimensions.
#[wasm_bindgen]
pub fn apply_crop(
    image: &JsDecodedImage,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Result<JsDecodedImage, JsValue> {
    let src = image.to_decoded()?;
    transform::apply_crop(&src, left, top, width, height)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Crop the largest centered region with the given aspect ratio ("free", "1:1", "16:9", ...).
#[wasm_bindgen]
pub fn crop_to_aspect(image: &JsDecodedImage, aspect: &str) -> Result<JsDecodedImage, JsValue> {
    let aspect: AspectRatio = aspect
        .parse()
        .map_err(|e: transform::TransformError| JsValue::from_str(&e.to_string()))?;
    transform::crop_to_aspect(&image.to_decoded()?, aspect)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render an image into `width` x `height` with a fit mode.
///
/// `mode` is one of "fit", "fill", "stretch" or "center"; `filter` is
/// 0=Nearest, 1=Bilinear, 2=Lanczos3.
#[wasm_bindgen]
pub fn apply_fit(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    mode: &str,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    let mode = fit_mode_from_str(mode)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown fit mode '{mode}'")))?;

    transform::apply_fit(&image.to_decoded()?, width, height, mode, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn fit_mode_from_str(mode: &str) -> Option<FitMode> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "fit" | "contain" => Some(FitMode::Fit),
        "fill" | "cover" => Some(FitMode::Fill),
        "stretch" => Some(FitMode::Stretch),
        "center" => Some(FitMode::Center),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> JsDecodedImage {
        let pixels: Vec<u8> = (0..(width * height * 3) as usize)
            .map(|i| (i % 256) as u8)
            .collect();
        JsDecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_crop_full_image() {
        let img = test_image(100, 100);
        let result = apply_crop(&img, 0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(result.width(), 100);
        assert_eq!(result.height(), 100);
    }

    #[test]
    fn test_crop_center() {
        let img = test_image(100, 100);
        let result = apply_crop(&img, 0.25, 0.25, 0.5, 0.5).unwrap();
        assert_eq!(result.width(), 50);
        assert_eq!(result.height(), 50);
    }

    #[test]
    fn test_crop_non_square() {
        let img = test_image(200, 100);
        let result = apply_crop(&img, 0.0, 0.0, 0.5, 1.0).unwrap();
        assert_eq!(result.width(), 100);
        assert_eq!(result.height(), 100);
    }

    #[test]
    fn test_fit_mode_from_str() {
        assert_eq!(fit_mode_from_str("Fit"), Some(FitMode::Fit));
        assert_eq!(fit_mode_from_str("cover"), Some(FitMode::Fill));
        assert_eq!(fit_mode_from_str("stretch"), Some(FitMode::Stretch));
        assert_eq!(fit_mode_from_str("center"), Some(FitMode::Center));
        assert_eq!(fit_mode_from_str("tile"), None);
    }
}
