//! Per-image operations and the sequential batch runner.
//!
//! Two operations mirror the tools:
//! - **compress**: decode, then size-targeted JPEG encode
//! - **resize**: decode, fit into new dimensions, then size-targeted encode in
//!   the requested format
//!
//! Each call takes an explicit, immutable options value and returns a fresh
//! [`ProcessedImage`]; nothing is shared between calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{EncodeError, Encoder, OutputFormat, RasterEncoder};
use crate::naming::{compressed_name, reduction_percent, resized_name};
use crate::search::{EncodeRequest, EncodeResult, SearchConfig};
use crate::transform::{resize_with_options, ResizeOptions, TransformError};

/// Quality used when none is given, on the 1-100 scale.
pub const DEFAULT_QUALITY: u8 = 85;

/// Errors from a single image operation.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Options for the resize operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessOptions {
    #[serde(flatten)]
    pub resize: ResizeOptions,
    pub format: OutputFormat,
    /// Quality ceiling on the 1-100 scale.
    pub quality: u8,
    /// Target size in KB; absent or non-positive disables the search.
    #[serde(alias = "targetSize")]
    pub target_kb: Option<f64>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            resize: ResizeOptions::default(),
            format: OutputFormat::Jpeg,
            quality: DEFAULT_QUALITY,
            target_kb: None,
        }
    }
}

/// Convert a 1-100 quality into the normalized (0, 1] scale, clamping out-of-range input.
pub fn normalized_quality(percent: u8) -> f32 {
    f32::from(percent.clamp(1, 100)) / 100.0
}

/// Result of one image operation, ready to download or package.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: f32,
    /// The size target could not be met.
    pub overshoot: bool,
    /// Size of the uploaded file in bytes.
    pub original_size: u64,
}

impl ProcessedImage {
    fn from_encoded(
        name: String,
        image: &DecodedImage,
        result: EncodeResult,
        original_size: u64,
    ) -> Self {
        Self {
            name,
            width: image.width,
            height: image.height,
            format: result.format,
            quality: result.quality,
            overshoot: result.overshoot,
            bytes: result.bytes,
            original_size,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.original_size, self.size())
    }
}

/// Shared cancellation flag, checked between batch items.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// What a batch does to each file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchOperation {
    Compress { quality: u8, target_kb: Option<f64> },
    Resize(ProcessOptions),
}

/// Progress after each finished item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub done: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// A file that failed; the batch continued past it.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub name: String,
    pub error: ProcessError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ProcessedImage>,
    pub failures: Vec<BatchFailure>,
    /// The cancel flag stopped the batch before every file was attempted.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn overshoot_count(&self) -> usize {
        self.processed.iter().filter(|p| p.overshoot).count()
    }
}

/// Runs image operations against an [`Encoder`].
#[derive(Debug, Clone, Default)]
pub struct Processor<E = RasterEncoder> {
    encoder: E,
    search: SearchConfig,
}

impl Processor<RasterEncoder> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Encoder> Processor<E> {
    pub fn with_encoder(encoder: E) -> Self {
        Self {
            encoder,
            search: SearchConfig::default(),
        }
    }

    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Decode `bytes` and re-encode as JPEG, optionally to a target size.
    ///
    /// The output is named `stem_compressed.jpg`.
    pub fn compress(
        &self,
        name: &str,
        bytes: &[u8],
        quality: u8,
        target_kb: Option<f64>,
    ) -> Result<ProcessedImage, ProcessError> {
        let image = decode_image(bytes)?;

        let mut request = EncodeRequest::new(OutputFormat::Jpeg, normalized_quality(quality));
        request.target_kb = target_kb;

        let result = self.search.search(&self.encoder, &image, &request)?;
        Ok(ProcessedImage::from_encoded(
            compressed_name(name),
            &image,
            result,
            bytes.len() as u64,
        ))
    }

    /// Decode `bytes`, fit into the requested dimensions and encode.
    ///
    /// The output is named after the format actually produced, which is JPEG
    /// when a PNG output was asked to hit a size target.
    pub fn resize(
        &self,
        name: &str,
        bytes: &[u8],
        options: &ProcessOptions,
    ) -> Result<ProcessedImage, ProcessError> {
        let decoded = decode_image(bytes)?;
        let image = resize_with_options(&decoded, &options.resize)?;

        let mut request = EncodeRequest::new(options.format, normalized_quality(options.quality));
        request.target_kb = options.target_kb;

        let result = self.search.search(&self.encoder, &image, &request)?;
        Ok(ProcessedImage::from_encoded(
            resized_name(name, result.format),
            &image,
            result,
            bytes.len() as u64,
        ))
    }

    /// Process `files` one after another.
    ///
    /// Failures are recorded and skipped. `cancel` is checked before each
    /// file; `progress` is called after each attempted file.
    pub fn run_batch<F>(
        &self,
        files: &[InputFile],
        operation: BatchOperation,
        cancel: &CancelFlag,
        mut progress: F,
    ) -> BatchReport
    where
        F: FnMut(BatchProgress),
    {
        let mut report = BatchReport::default();
        let total = files.len();

        for (index, file) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(done = index, total, "batch cancelled");
                report.cancelled = true;
                break;
            }

            let outcome = match operation {
                BatchOperation::Compress { quality, target_kb } => {
                    self.compress(&file.name, &file.bytes, quality, target_kb)
                }
                BatchOperation::Resize(options) => self.resize(&file.name, &file.bytes, &options),
            };

            match outcome {
                Ok(processed) => {
                    tracing::info!(
                        name = %processed.name,
                        size = processed.size(),
                        overshoot = processed.overshoot,
                        "processed image"
                    );
                    report.processed.push(processed);
                }
                Err(error) => {
                    tracing::warn!(name = %file.name, %error, "failed to process image");
                    report.failures.push(BatchFailure {
                        index,
                        name: file.name.clone(),
                        error,
                    });
                }
            }

            progress(BatchProgress {
                done: index + 1,
                total,
            });
        }

        report
    }
}

/// [`Processor::compress`] with the default encoder.
pub fn compress_image(
    name: &str,
    bytes: &[u8],
    quality: u8,
    target_kb: Option<f64>,
) -> Result<ProcessedImage, ProcessError> {
    Processor::new().compress(name, bytes, quality, target_kb)
}

/// [`Processor::resize`] with the default encoder.
pub fn resize_image(
    name: &str,
    bytes: &[u8],
    options: &ProcessOptions,
) -> Result<ProcessedImage, ProcessError> {
    Processor::new().resize(name, bytes, options)
}

/// [`Processor::run_batch`] with the default encoder.
pub fn process_batch<F>(
    files: &[InputFile],
    operation: BatchOperation,
    cancel: &CancelFlag,
    progress: F,
) -> BatchReport
where
    F: FnMut(BatchProgress),
{
    Processor::new().run_batch(files, operation, cancel, progress)
}
