//! Resize planning and fit modes.
//!
//! [`compute_target_dimensions`] turns the resizer's loose inputs (width,
//! height, scale percent, keep-aspect) into concrete output dimensions, and
//! [`apply_fit`] renders the source into those dimensions.

use serde::{Deserialize, Serialize};

use super::crop::crop_region;
use super::{check_output, check_source, TransformError};
use crate::decode::{resize, DecodedImage, FilterType};

/// Background used wherever the output canvas is larger than the drawn image.
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// How the source is placed into the target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fit inside, letterbox with the background.
    #[default]
    Fit,
    /// Scale to cover, cropping the overflow around the center.
    Fill,
    /// Scale to exactly the target, ignoring aspect ratio.
    Stretch,
    /// No scaling; center on a canvas at least as large as both.
    Center,
}

/// Resize inputs as collected from the resizer form.
///
/// Zero or missing width/height mean "not set"; a scale percent, when set,
/// overrides both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(alias = "scale")]
    pub scale_percent: Option<f64>,
    pub keep_aspect: bool,
    pub fit_mode: FitMode,
    pub filter: FilterType,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale_percent: None,
            keep_aspect: true,
            fit_mode: FitMode::default(),
            filter: FilterType::default(),
        }
    }
}

impl ResizeOptions {
    /// True when no option would change the image.
    pub fn is_identity(&self) -> bool {
        self.width.filter(|w| *w > 0).is_none()
            && self.height.filter(|h| *h > 0).is_none()
            && self.scale().is_none()
    }

    fn scale(&self) -> Option<f64> {
        self.scale_percent.filter(|s| s.is_finite() && *s > 0.0)
    }
}

/// Compute output dimensions for a `src_w` x `src_h` source.
///
/// Precedence: scale percent, then explicit width/height. A single dimension
/// derives the other from the source aspect when `keep_aspect` is set (and
/// keeps the source value otherwise). Both dimensions with `keep_aspect`
/// shrink one side so the source aspect is preserved. Results are at least 1.
pub fn compute_target_dimensions(src_w: u32, src_h: u32, options: &ResizeOptions) -> (u32, u32) {
    let sw = src_w as f64;
    let sh = src_h.max(1) as f64;

    let (mut width, mut height) = match options.scale() {
        Some(scale) => (
            Some((sw * scale / 100.0).round() as u32),
            Some((sh * scale / 100.0).round() as u32),
        ),
        None => (
            options.width.filter(|w| *w > 0),
            options.height.filter(|h| *h > 0),
        ),
    };

    // Scaling a tiny image can round to zero; treat that as one pixel, not "unset".
    if options.scale().is_some() {
        width = width.map(|w| w.max(1));
        height = height.map(|h| h.max(1));
    }

    let (w, h) = match (width, height) {
        (None, None) => (src_w, src_h),
        (Some(w), None) => {
            let h = if options.keep_aspect {
                (w as f64 / sw.max(1.0) * sh).round() as u32
            } else {
                src_h
            };
            (w, h)
        }
        (None, Some(h)) => {
            let w = if options.keep_aspect {
                (h as f64 / sh * sw).round() as u32
            } else {
                src_w
            };
            (w, h)
        }
        (Some(w), Some(h)) if options.keep_aspect => {
            let ratio = sw / sh;
            if w as f64 / h as f64 > ratio {
                ((h as f64 * ratio).round() as u32, h)
            } else {
                (w, (w as f64 / ratio).round() as u32)
            }
        }
        (Some(w), Some(h)) => (w, h),
    };

    (w.max(1), h.max(1))
}

/// Render `image` into a `width` x `height` output using `mode`.
///
/// [`FitMode::Center`] may produce a larger canvas than requested: it never
/// shrinks the source.
///
/// # Errors
///
/// Returns `TransformError::DimensionsTooLarge` before allocating an output
/// beyond [`super::MAX_EDGE`] or [`super::MAX_PIXELS`].
pub fn apply_fit(
    image: &DecodedImage,
    width: u32,
    height: u32,
    mode: FitMode,
    filter: FilterType,
) -> Result<DecodedImage, TransformError> {
    check_source(image)?;
    if width == 0 || height == 0 {
        return Err(TransformError::Resize(
            crate::decode::DecodeError::InvalidDimensions { width, height },
        ));
    }
    check_output(width, height)?;

    let (src_w, src_h) = (image.width as f64, image.height as f64);

    match mode {
        FitMode::Stretch => Ok(resize(image, width, height, filter)?),
        FitMode::Fit => {
            let ratio = (width as f64 / src_w).min(height as f64 / src_h);
            let dw = ((src_w * ratio).round() as u32).clamp(1, width);
            let dh = ((src_h * ratio).round() as u32).clamp(1, height);
            let scaled = resize(image, dw, dh, filter)?;

            let mut canvas = DecodedImage::filled(width, height, BACKGROUND);
            overlay(&mut canvas, &scaled, centered(width, dw), centered(height, dh));
            Ok(canvas)
        }
        FitMode::Fill => {
            let ratio = (width as f64 / src_w).max(height as f64 / src_h);
            let sw = ((width as f64 / ratio).round() as u32).clamp(1, image.width);
            let sh = ((height as f64 / ratio).round() as u32).clamp(1, image.height);
            let region = crop_region(
                image,
                centered(image.width, sw),
                centered(image.height, sh),
                sw,
                sh,
            );
            Ok(resize(&region, width, height, filter)?)
        }
        FitMode::Center => {
            let canvas_w = image.width.max(width);
            let canvas_h = image.height.max(height);
            check_output(canvas_w, canvas_h)?;

            let mut canvas = DecodedImage::filled(canvas_w, canvas_h, BACKGROUND);
            overlay(
                &mut canvas,
                image,
                centered(canvas_w, image.width),
                centered(canvas_h, image.height),
            );
            Ok(canvas)
        }
    }
}

/// Compute dimensions from `options` and render with its fit mode.
pub fn resize_with_options(
    image: &DecodedImage,
    options: &ResizeOptions,
) -> Result<DecodedImage, TransformError> {
    if options.is_identity() {
        return Ok(image.clone());
    }

    let (width, height) = compute_target_dimensions(image.width, image.height, options);
    apply_fit(image, width, height, options.fit_mode, options.filter)
}

/// Offset that centers `inner` within `outer`, rounding half up.
fn centered(outer: u32, inner: u32) -> u32 {
    (outer.saturating_sub(inner) + 1) / 2
}

/// Copy `src` onto `canvas` at (`x`, `y`), clipping at the canvas edges.
fn overlay(canvas: &mut DecodedImage, src: &DecodedImage, x: u32, y: u32) {
    if x >= canvas.width || y >= canvas.height {
        return;
    }

    let copy_w = src.width.min(canvas.width - x) as usize * 3;
    let copy_h = src.height.min(canvas.height - y);
    let canvas_stride = canvas.width as usize * 3;
    let src_stride = src.width as usize * 3;

    for row in 0..copy_h as usize {
        let dst = (y as usize + row) * canvas_stride + x as usize * 3;
        let from = row * src_stride;
        canvas.pixels[dst..dst + copy_w].copy_from_slice(&src.pixels[from..from + copy_w]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> DecodedImage {
        DecodedImage::filled(width, height, [10, 20, 30])
    }

    fn opts() -> ResizeOptions {
        ResizeOptions::default()
    }

    #[test]
    fn test_dimensions_unset_keeps_source() {
        assert_eq!(compute_target_dimensions(640, 480, &opts()), (640, 480));
    }

    #[test]
    fn test_dimensions_zero_treated_as_unset() {
        let o = ResizeOptions {
            width: Some(0),
            height: Some(0),
            ..opts()
        };
        assert_eq!(compute_target_dimensions(640, 480, &o), (640, 480));
        assert!(o.is_identity());
    }

    #[test]
    fn test_dimensions_scale_percent() {
        let o = ResizeOptions {
            scale_percent: Some(50.0),
            width: Some(9999),
            ..opts()
        };
        assert_eq!(compute_target_dimensions(640, 480, &o), (320, 240));
    }

    #[test]
    fn test_dimensions_tiny_scale_is_at_least_one() {
        let o = ResizeOptions {
            scale_percent: Some(1.0),
            ..opts()
        };
        assert_eq!(compute_target_dimensions(20, 10, &o), (1, 1));
    }

    #[test]
    fn test_dimensions_width_only() {
        let keep = ResizeOptions {
            width: Some(320),
            ..opts()
        };
        assert_eq!(compute_target_dimensions(640, 480, &keep), (320, 240));

        let free = ResizeOptions {
            keep_aspect: false,
            ..keep
        };
        assert_eq!(compute_target_dimensions(640, 480, &free), (320, 480));
    }

    #[test]
    fn test_dimensions_height_only() {
        let keep = ResizeOptions {
            height: Some(240),
            ..opts()
        };
        assert_eq!(compute_target_dimensions(640, 480, &keep), (320, 240));

        let free = ResizeOptions {
            keep_aspect: false,
            ..keep
        };
        assert_eq!(compute_target_dimensions(640, 480, &free), (640, 240));
    }

    #[test]
    fn test_dimensions_both_with_keep_aspect_shrinks_one_side() {
        let o = ResizeOptions {
            width: Some(400),
            height: Some(400),
            ..opts()
        };
        assert_eq!(compute_target_dimensions(800, 400, &o), (400, 200));
        assert_eq!(compute_target_dimensions(400, 800, &o), (200, 400));
    }

    #[test]
    fn test_dimensions_both_without_keep_aspect() {
        let o = ResizeOptions {
            width: Some(100),
            height: Some(300),
            keep_aspect: false,
            ..opts()
        };
        assert_eq!(compute_target_dimensions(800, 400, &o), (100, 300));
    }

    #[test]
    fn test_fit_letterboxes_on_white() {
        let out = apply_fit(&solid(200, 100), 100, 100, FitMode::Fit, FilterType::Nearest).unwrap();

        assert_eq!((out.width, out.height), (100, 100));
        // top row is background, middle row is image
        assert_eq!(&out.pixels[0..3], &BACKGROUND);
        let middle = (50 * 100 + 50) * 3;
        assert_eq!(&out.pixels[middle..middle + 3], &[10, 20, 30]);
    }

    #[test]
    fn test_fill_covers_without_background() {
        let out = apply_fit(&solid(200, 100), 100, 100, FitMode::Fill, FilterType::Nearest).unwrap();

        assert_eq!((out.width, out.height), (100, 100));
        assert!(out.pixels.chunks(3).all(|px| px == [10, 20, 30]));
    }

    #[test]
    fn test_stretch_exact_size() {
        let out = apply_fit(&solid(200, 100), 50, 80, FitMode::Stretch, FilterType::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (50, 80));
    }

    #[test]
    fn test_center_never_shrinks() {
        let out = apply_fit(&solid(200, 100), 50, 300, FitMode::Center, FilterType::Nearest).unwrap();

        assert_eq!((out.width, out.height), (200, 300));
        assert_eq!(&out.pixels[0..3], &BACKGROUND);
        let middle = (150 * 200 + 100) * 3;
        assert_eq!(&out.pixels[middle..middle + 3], &[10, 20, 30]);
    }

    #[test]
    fn test_fit_rejects_zero_target() {
        assert!(matches!(
            apply_fit(&solid(10, 10), 0, 10, FitMode::Fit, FilterType::Nearest),
            Err(TransformError::Resize(_))
        ));
    }

    #[test]
    fn test_fit_rejects_empty_image() {
        let empty = DecodedImage::new(0, 0, vec![]);
        assert!(matches!(
            apply_fit(&empty, 10, 10, FitMode::Fit, FilterType::Nearest),
            Err(TransformError::EmptyImage)
        ));
    }

    #[test]
    fn test_fit_rejects_short_buffer() {
        let short = DecodedImage {
            width: 8,
            height: 8,
            pixels: vec![0u8; 12],
        };
        assert!(matches!(
            apply_fit(&short, 16, 16, FitMode::Center, FilterType::Nearest),
            Err(TransformError::InvalidBuffer { .. })
        ));
    }

    #[test]
    fn test_huge_scale_is_rejected_before_allocating() {
        let o = ResizeOptions {
            scale_percent: Some(1e12),
            ..opts()
        };
        let img = solid(8, 6);
        assert_eq!(compute_target_dimensions(8, 6, &o).0, u32::MAX);

        for mode in [FitMode::Fit, FitMode::Fill, FitMode::Stretch, FitMode::Center] {
            let o = ResizeOptions { fit_mode: mode, ..o };
            assert!(matches!(
                resize_with_options(&img, &o),
                Err(TransformError::DimensionsTooLarge { .. })
            ));
        }
    }

    #[test]
    fn test_oversized_area_is_rejected() {
        assert!(matches!(
            apply_fit(&solid(2, 2), 30_000, 30_000, FitMode::Stretch, FilterType::Nearest),
            Err(TransformError::DimensionsTooLarge {
                width: 30_000,
                height: 30_000
            })
        ));
    }

    #[test]
    fn test_resize_with_options_identity() {
        let img = solid(30, 20);
        assert_eq!(resize_with_options(&img, &opts()).unwrap(), img);
    }

    #[test]
    fn test_resize_with_options_width_only() {
        let o = ResizeOptions {
            width: Some(15),
            fit_mode: FitMode::Stretch,
            ..opts()
        };
        let out = resize_with_options(&solid(30, 20), &o).unwrap();
        assert_eq!((out.width, out.height), (15, 10));
    }

    #[test]
    fn test_centered_rounds_half_up() {
        assert_eq!(centered(10, 5), 3);
        assert_eq!(centered(10, 4), 3);
        assert_eq!(centered(4, 10), 0);
    }

    #[test]
    fn test_overlay_clips() {
        let mut canvas = DecodedImage::filled(4, 4, [0, 0, 0]);
        overlay(&mut canvas, &DecodedImage::filled(4, 4, [9, 9, 9]), 2, 2);

        let painted = canvas.pixels.chunks(3).filter(|px| *px == [9, 9, 9]).count();
        assert_eq!(painted, 4);
    }
}
