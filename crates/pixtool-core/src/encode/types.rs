//! Output formats and encoding errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while encoding a raster surface.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The format is known but no encoder for it was compiled in
    #[error("Encoding to {0} is not supported in this build")]
    UnsupportedFormat(OutputFormat),

    /// The underlying codec failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Output format of an encode.
///
/// Deserializes from the short name (`"jpeg"`, `"jpg"`, `"webp"`, `"png"`) or
/// the MIME type the browser tools used (`"image/jpeg"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "jpg", alias = "image/jpeg")]
    Jpeg,
    #[serde(alias = "image/webp")]
    Webp,
    #[serde(alias = "image/png")]
    Png,
}

impl OutputFormat {
    /// Parse a MIME type or short name. Unknown values return `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "image/webp" | "webp" => Some(OutputFormat::Webp),
            "image/png" | "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Png => "image/png",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
            OutputFormat::Png => "png",
        }
    }

    /// Whether the encoder exposes a quality knob that changes output size.
    pub fn supports_quality(self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Webp)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Webp => "WebP",
            OutputFormat::Png => "PNG",
        };
        f.write_str(name)
    }
}

/// Map a normalized quality in (0, 1] to the 1-100 scale codecs expect.
///
/// Non-finite input maps to 1.
pub fn quality_to_percent(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 1;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Validate dimensions and RGB buffer length before handing pixels to a codec.
pub(crate) fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(OutputFormat::from_mime("image/jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_mime("JPG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_mime("image/webp"), Some(OutputFormat::Webp));
        assert_eq!(OutputFormat::from_mime(" png "), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_mime("image/gif"), None);
    }

    #[test]
    fn test_mime_and_extension() {
        assert_eq!(OutputFormat::Jpeg.mime(), "image/jpeg");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Webp.extension(), "webp");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn test_supports_quality() {
        assert!(OutputFormat::Jpeg.supports_quality());
        assert!(OutputFormat::Webp.supports_quality());
        assert!(!OutputFormat::Png.supports_quality());
    }

    #[test]
    fn test_deserialize_aliases() {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;

        for (input, expected) in [
            ("jpeg", OutputFormat::Jpeg),
            ("jpg", OutputFormat::Jpeg),
            ("image/jpeg", OutputFormat::Jpeg),
            ("image/webp", OutputFormat::Webp),
            ("png", OutputFormat::Png),
        ] {
            let de: StrDeserializer<'_, Error> = input.into_deserializer();
            assert_eq!(OutputFormat::deserialize(de).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_quality_to_percent() {
        assert_eq!(quality_to_percent(1.0), 100);
        assert_eq!(quality_to_percent(0.85), 85);
        assert_eq!(quality_to_percent(0.05), 5);
        assert_eq!(quality_to_percent(0.001), 1);
        assert_eq!(quality_to_percent(7.0), 100);
        assert_eq!(quality_to_percent(f32::NAN), 1);
    }

    #[test]
    fn test_validate_rgb() {
        assert!(validate_rgb(&[0u8; 12], 2, 2).is_ok());
        assert!(matches!(
            validate_rgb(&[0u8; 11], 2, 2),
            Err(EncodeError::InvalidPixelData {
                expected: 12,
                actual: 11
            })
        ));
        assert!(matches!(
            validate_rgb(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = EncodeError::UnsupportedFormat(OutputFormat::Webp);
        assert_eq!(err.to_string(), "Encoding to WebP is not supported in this build");
    }
}
