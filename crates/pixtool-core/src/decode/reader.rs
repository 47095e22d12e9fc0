//! Image decoding (JPEG, PNG, WebP) with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::types::Orientation;
use super::{DecodeError, DecodedImage};

/// Decode uploaded image bytes into an RGB raster surface.
///
/// The format is sniffed from the magic bytes. EXIF orientation is applied
/// for JPEG input, and any alpha channel is composited onto white so the
/// surface can be exported to formats without transparency.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are empty or the format
/// cannot be recognized, and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let format = sniff_format(bytes)?;

    let orientation = if format == ImageFormat::Jpeg {
        extract_orientation(bytes)
    } else {
        Orientation::Normal
    };

    let img = decode_dynamic(bytes, format)?;
    let oriented = apply_orientation(img, orientation);

    Ok(flatten_onto_white(oriented))
}

fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }
    image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)
}

fn decode_dynamic(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, DecodeError> {
    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(format);
    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Composite onto a white background, dropping alpha.
fn flatten_onto_white(img: DynamicImage) -> DecodedImage {
    if !img.color().has_alpha() {
        return DecodedImage::from_rgb_image(img.into_rgb8());
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);

    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let alpha = u32::from(a);
        for c in [r, g, b] {
            let blended = (u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255;
            pixels.push(blended as u8);
        }
    }

    DecodedImage::new(width, height, pixels)
}
