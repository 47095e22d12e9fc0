//! Pixtool Core - Image compression and resizing library
//!
//! This crate provides the image processing behind the Pixtool compressor and
//! resizer: decoding, resize-with-fit, cropping, encoding to JPEG/WebP/PNG, and
//! a quality search that fits an encode under a target size in KB.
//!
//! # Module Structure
//!
//! - `decode` - Format sniffing, EXIF orientation and resampling
//! - `encode` - The [`encode::Encoder`] seam and its JPEG/WebP/PNG implementation
//! - `search` - Bisection over encoder quality to hit a size target
//! - `transform` - Fit modes, target dimensions and cropping
//! - `naming` - Output file names and human-readable sizes
//! - `pipeline` - Compress/resize operations and the batch runner

pub mod decode;
pub mod encode;
pub mod naming;
pub mod pipeline;
pub mod search;
pub mod transform;

pub use decode::{decode_image, DecodeError, DecodedImage, FilterType};
pub use encode::{EncodeError, Encoder, OutputFormat, RasterEncoder};
pub use naming::format_bytes;
pub use pipeline::{
    compress_image, process_batch, resize_image, BatchOperation, BatchReport, CancelFlag,
    InputFile, ProcessError, ProcessOptions, ProcessedImage, Processor,
};
pub use search::{search_quality, EncodeRequest, EncodeResult, SearchConfig};
pub use transform::{apply_crop, crop_to_aspect, AspectRatio, FitMode, ResizeOptions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_through_crate_root() {
        let image = DecodedImage::filled(16, 16, [200, 100, 50]);
        let request = EncodeRequest::new(OutputFormat::Jpeg, 0.9).with_target_kb(64.0);

        let result = search_quality(&RasterEncoder, &image, &request).unwrap();
        assert_eq!(result.format, OutputFormat::Jpeg);
        assert!(!result.overshoot);
        assert!(result.size_kb() <= 64.0);
    }

    #[test]
    fn test_process_options_from_defaults() {
        let options = ProcessOptions::default();
        assert_eq!(options.resize, ResizeOptions::default());
        assert_eq!(options.resize.fit_mode, FitMode::Fit);
    }
}
