//! Image decoding pipeline.
//!
//! This module provides functionality for:
//! - Decoding uploaded JPEG, PNG and WebP bytes into an RGB raster surface
//! - EXIF orientation correction for camera JPEGs
//! - Image resizing primitives used by the fit modes in [`crate::transform`]
//!
//! All operations are synchronous and single-threaded; in the browser they run
//! inside a Web Worker through the WASM bindings.
//!
//! # Examples
//!
//! ```ignore
//! use pixtool_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::decode_image;
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType};
