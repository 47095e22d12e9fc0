//! Size-targeted encoding.
//!
//! Given a raster surface and a target size in kilobytes, find the highest
//! encoder quality whose output fits the target, using bisection over a
//! bounded number of encodes.
//!
//! # Algorithm
//!
//! Encoded size is monotonically non-decreasing in quality for real codecs, so
//! the search keeps an interval `[low, high]` where `low` is known to fit (or is
//! the floor) and `high` is known to overshoot (or is the ceiling):
//!
//! 1. `low = 0.05`, `high = quality_ceiling`
//! 2. up to 8 times: encode at `mid = (low + high) / 2`; too large → `high = mid`,
//!    otherwise remember the result and `low = mid`
//! 3. return the best fitting result, or fall back to one encode at the ceiling
//!    with [`EncodeResult::overshoot`] set
//!
//! Without a target (or with a non-positive one) a single encode is performed.
//! Formats without a quality knob (PNG) are re-encoded once as JPEG when a
//! target is requested.
//!
//! # Logging
//!
//! Steps are emitted as `tracing` debug events and a fallback as a warning.
//! Without an installed subscriber, as in the browser build, these are dropped;
//! callers that need to surface a missed target read [`EncodeResult::overshoot`]
//! instead.
//!
//! # Example
//!
//! ```ignore
//! use pixtool_core::encode::{OutputFormat, RasterEncoder};
//! use pixtool_core::search::{search_quality, EncodeRequest};
//!
//! let request = EncodeRequest::new(OutputFormat::Jpeg, 0.9).with_target_kb(150.0);
//! let result = search_quality(&RasterEncoder, &image, &request)?;
//! if result.overshoot {
//!     println!("Could not reach 150 KB, got {:.1} KB", result.size_kb());
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::encode::{quality_to_percent, EncodeError, Encoder, OutputFormat};

/// Lowest quality the search will try.
pub const MIN_QUALITY: f32 = 0.05;

/// Encoder invocations allowed before the search settles.
pub const MAX_ITERATIONS: u32 = 8;

/// Lowest accepted quality ceiling; smaller requests are raised to this.
const CEILING_FLOOR: f32 = 0.01;

/// Tunables for the bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Initial lower bound of the quality interval.
    pub min_quality: f32,
    /// Maximum number of bisection steps.
    pub max_iterations: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_quality: MIN_QUALITY,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// One size-targeted encode request. The surface is passed alongside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeRequest {
    /// Requested output format.
    pub format: OutputFormat,
    /// Target size in kilobytes (1 KB = 1024 bytes). `None` disables the search.
    #[serde(default)]
    pub target_kb: Option<f64>,
    /// Starting (and highest) quality, in (0, 1].
    pub quality_ceiling: f32,
}

impl EncodeRequest {
    pub fn new(format: OutputFormat, quality_ceiling: f32) -> Self {
        Self {
            format,
            target_kb: None,
            quality_ceiling,
        }
    }

    pub fn with_target_kb(mut self, target_kb: f64) -> Self {
        self.target_kb = Some(target_kb);
        self
    }

    /// The target, if it is usable. Non-positive and non-finite targets mean "no target".
    pub fn effective_target_kb(&self) -> Option<f64> {
        self.target_kb.filter(|kb| kb.is_finite() && *kb > 0.0)
    }

    /// The ceiling clamped into `[0.01, 1.0]`; NaN becomes 1.0.
    pub fn effective_ceiling(&self) -> f32 {
        if self.quality_ceiling.is_nan() {
            return 1.0;
        }
        self.quality_ceiling.clamp(CEILING_FLOOR, 1.0)
    }
}

/// Encoded output of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeResult {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Format actually produced. Differs from the request when PNG fell back to JPEG.
    pub format: OutputFormat,
    /// Quality the search chose, in (0, 1].
    ///
    /// This is the bisection midpoint as tried. [`crate::encode::RasterEncoder`]
    /// applies it on the codecs' 1-100 scale, so the setting actually used is
    /// [`EncodeResult::quality_percent`].
    pub quality: f32,
    /// True when a target was requested and the result exceeds it.
    pub overshoot: bool,
}

impl EncodeResult {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn size_kb(&self) -> f64 {
        bytes_to_kb(self.bytes.len())
    }

    /// Quality on the 1-100 scale the codecs were driven at.
    pub fn quality_percent(&self) -> u8 {
        quality_to_percent(self.quality)
    }
}

fn bytes_to_kb(len: usize) -> f64 {
    len as f64 / 1024.0
}

/// Bisection state, owned by one in-flight search.
#[derive(Debug)]
struct SearchState {
    low: f32,
    high: f32,
    best: Option<EncodeResult>,
    iterations_remaining: u32,
}

impl SearchState {
    fn new(config: &SearchConfig, ceiling: f32) -> Self {
        let floor = if config.min_quality.is_finite() && config.min_quality > 0.0 {
            config.min_quality
        } else {
            MIN_QUALITY
        };
        Self {
            low: floor.clamp(f32::EPSILON, ceiling),
            high: ceiling,
            best: None,
            iterations_remaining: config.max_iterations,
        }
    }

    fn next_quality(&mut self) -> Option<f32> {
        if self.iterations_remaining == 0 {
            return None;
        }
        self.iterations_remaining -= 1;
        Some((self.low + self.high) / 2.0)
    }

    fn record_fit(&mut self, quality: f32, result: EncodeResult) {
        self.low = quality;
        self.best = Some(result);
    }

    fn record_overshoot(&mut self, quality: f32) {
        self.high = quality;
    }
}

impl SearchConfig {
    /// Run the search with these tunables.
    ///
    /// # Errors
    ///
    /// Any encoder failure aborts the search and is returned unchanged.
    pub fn search<E: Encoder + ?Sized>(
        &self,
        encoder: &E,
        image: &DecodedImage,
        request: &EncodeRequest,
    ) -> Result<EncodeResult, EncodeError> {
        let ceiling = request.effective_ceiling();

        let Some(target_kb) = request.effective_target_kb() else {
            return encode_once(encoder, image, request.format, ceiling, None);
        };

        if !request.format.supports_quality() {
            tracing::debug!(
                format = %request.format,
                "format has no quality setting, re-encoding as JPEG to honor size target"
            );
            return encode_once(encoder, image, OutputFormat::Jpeg, ceiling, Some(target_kb));
        }

        let mut state = SearchState::new(self, ceiling);

        while let Some(quality) = state.next_quality() {
            let bytes = encoder.encode(image, request.format, quality)?;
            let size_kb = bytes_to_kb(bytes.len());

            tracing::debug!(quality, size_kb, target_kb, "quality search step");

            if size_kb > target_kb {
                state.record_overshoot(quality);
            } else {
                state.record_fit(
                    quality,
                    EncodeResult {
                        bytes,
                        format: request.format,
                        quality,
                        overshoot: false,
                    },
                );
            }
        }

        if let Some(best) = state.best {
            return Ok(best);
        }

        let fallback = encode_once(encoder, image, request.format, ceiling, Some(target_kb))?;
        tracing::warn!(
            target_kb,
            size_kb = fallback.size_kb(),
            "size target unreachable at minimum quality, returning ceiling-quality result"
        );
        Ok(fallback)
    }
}

/// Encode `image` as close to `request.target_kb` as possible without exceeding it.
///
/// Uses the default [`SearchConfig`] (floor 0.05, 8 steps).
pub fn search_quality<E: Encoder + ?Sized>(
    encoder: &E,
    image: &DecodedImage,
    request: &EncodeRequest,
) -> Result<EncodeResult, EncodeError> {
    SearchConfig::default().search(encoder, image, request)
}

fn encode_once<E: Encoder + ?Sized>(
    encoder: &E,
    image: &DecodedImage,
    format: OutputFormat,
    quality: f32,
    target_kb: Option<f64>,
) -> Result<EncodeResult, EncodeError> {
    let bytes = encoder.encode(image, format, quality)?;
    let overshoot = target_kb.is_some_and(|kb| bytes_to_kb(bytes.len()) > kb);
    Ok(EncodeResult {
        bytes,
        format,
        quality,
        overshoot,
    })
}
