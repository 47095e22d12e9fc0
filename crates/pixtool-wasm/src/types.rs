//! WASM-compatible wrapper types for image data and encode results.
//!
//! These types wrap the core Pixtool types and handle the conversion between
//! Rust and JavaScript data representations.

use pixtool_core::decode::{DecodedImage, FilterType};
use pixtool_core::encode::{quality_to_percent, OutputFormat};
use pixtool_core::pipeline::ProcessedImage;
use pixtool_core::search::EncodeResult;
use wasm_bindgen::prelude::*;

/// A decoded RGB image held in WASM memory.
///
/// # Memory Management
///
/// `pixels()` copies the buffer into a JavaScript `Uint8Array`. Keep images in
/// WASM memory between operations and only extract pixels when drawing.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an image from dimensions and RGB pixel data (3 bytes per pixel, row-major).
    ///
    /// The buffer length is checked when the image is passed to an operation,
    /// which then throws instead of reading out of bounds.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as a Uint8Array copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer also releases it.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage. Clones the pixel data.
    ///
    /// Fails when the buffer is not exactly `width * height * 3` bytes.
    pub(crate) fn to_decoded(&self) -> Result<DecodedImage, JsValue> {
        let image = DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        };
        if !image.has_valid_buffer() {
            return Err(JsValue::from_str(&self.buffer_mismatch()));
        }
        Ok(image)
    }

    fn buffer_mismatch(&self) -> String {
        let expected = u64::from(self.width) * u64::from(self.height) * 3;
        format!(
            "Pixel buffer holds {} bytes, expected {} for {}x{} RGB",
            self.pixels.len(),
            expected,
            self.width,
            self.height
        )
    }
}

/// Output of a (possibly size-targeted) encode.
#[wasm_bindgen]
pub struct JsEncodeResult {
    bytes: Vec<u8>,
    format: OutputFormat,
    quality: f32,
    overshoot: bool,
}

#[wasm_bindgen]
impl JsEncodeResult {
    /// Encoded file bytes as a Uint8Array copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// MIME type of the produced format, for building a `Blob`.
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.format.mime().to_string()
    }

    /// File extension of the produced format, without the dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.format.extension().to_string()
    }

    /// Quality of the kept encode, in (0, 1], as tried by the search.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// The 1-100 setting the codec was given for `quality`.
    #[wasm_bindgen(getter)]
    pub fn quality_percent(&self) -> u8 {
        quality_to_percent(self.quality)
    }

    /// True when the size target could not be met.
    #[wasm_bindgen(getter)]
    pub fn overshoot(&self) -> bool {
        self.overshoot
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    #[wasm_bindgen(getter)]
    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }
}

impl From<EncodeResult> for JsEncodeResult {
    fn from(result: EncodeResult) -> Self {
        Self {
            bytes: result.bytes,
            format: result.format,
            quality: result.quality,
            overshoot: result.overshoot,
        }
    }
}

/// A compressed or resized file, ready to download.
#[wasm_bindgen]
pub struct JsProcessedImage {
    inner: ProcessedImage,
}

#[wasm_bindgen]
impl JsProcessedImage {
    /// Suggested download name, e.g. `photo-resized.jpg`.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.name.clone()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.inner.format.mime().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.inner.quality
    }

    #[wasm_bindgen(getter)]
    pub fn overshoot(&self) -> bool {
        self.inner.overshoot
    }

    #[wasm_bindgen(getter)]
    pub fn original_size(&self) -> f64 {
        self.inner.original_size as f64
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.inner.size() as f64
    }

    /// Percentage saved relative to the upload; negative if the file grew.
    #[wasm_bindgen(getter)]
    pub fn reduction_percent(&self) -> f64 {
        self.inner.reduction_percent()
    }
}

impl From<ProcessedImage> for JsProcessedImage {
    fn from(inner: ProcessedImage) -> Self {
        Self { inner }
    }
}

/// Convert a u8 filter value to the core FilterType.
///
/// - 0 = Nearest
/// - 1 = Bilinear
/// - 2 = Lanczos3
///
/// Any other value falls back to Lanczos3, the resizer's default.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        _ => FilterType::Lanczos3,
    }
}

/// Parse a format name or MIME type ("jpeg", "image/webp", ...).
pub(crate) fn parse_format(value: &str) -> Result<OutputFormat, JsValue> {
    OutputFormat::from_mime(value)
        .ok_or_else(|| JsValue::from_str(&format!("Unsupported output format '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_decoded_round_trip_keeps_pixels() {
        let decoded = DecodedImage::new(2, 1, vec![255, 128, 64, 32, 16, 8]);
        let js_img = JsDecodedImage::from_decoded(decoded.clone());
        assert_eq!(js_img.to_decoded().unwrap(), decoded);
    }

    #[test]
    fn test_buffer_mismatch_message() {
        let img = JsDecodedImage::new(4, 2, vec![0u8; 5]);
        assert_eq!(
            img.buffer_mismatch(),
            "Pixel buffer holds 5 bytes, expected 24 for 4x2 RGB"
        );
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(255), FilterType::Lanczos3);
    }

    #[test]
    fn test_encode_result_accessors() {
        let result = JsEncodeResult::from(EncodeResult {
            bytes: vec![0u8; 2048],
            format: OutputFormat::Webp,
            quality: 0.5,
            overshoot: true,
        });

        assert_eq!(result.size(), 2048);
        assert_eq!(result.size_kb(), 2.0);
        assert_eq!(result.mime(), "image/webp");
        assert_eq!(result.extension(), "webp");
        assert_eq!(result.quality_percent(), 50);
        assert!(result.overshoot());
    }

    #[test]
    fn test_processed_image_accessors() {
        let result = JsProcessedImage::from(ProcessedImage {
            name: "a_compressed.jpg".to_string(),
            bytes: vec![0u8; 250],
            width: 10,
            height: 20,
            format: OutputFormat::Jpeg,
            quality: 0.8,
            overshoot: false,
            original_size: 1000,
        });

        assert_eq!(result.name(), "a_compressed.jpg");
        assert_eq!(result.size(), 250.0);
        assert_eq!(result.reduction_percent(), 75.0);
        assert_eq!(result.mime(), "image/jpeg");
    }
}
