//! Pixtool WASM - WebAssembly bindings for Pixtool
//!
//! This crate exposes the pixtool-core compressor, resizer and cropper to
//! JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for images and encode results
//! - `decode` - Decoding and plain resizing
//! - `encode` - Fixed-quality and size-targeted encoding
//! - `transform` - Crop, aspect crop and fit modes
//! - `process` - Whole-file compress/resize and batches
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@pixtool/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = compress_image(file.name, bytes, 85, 150);
//! console.log(`${out.name}: ${out.size} bytes, quality ${out.quality}`);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod process;
mod transform;
mod types;

pub use decode::{decode_image, resize};
pub use encode::{encode_image, search_quality};
pub use process::{compress_image, format_bytes, resize_image, JsBatch, JsBatchReport};
pub use transform::{apply_crop, apply_fit, crop_to_aspect};
pub use types::{JsDecodedImage, JsEncodeResult, JsProcessedImage};

/// Initialize the WASM module (called automatically on load)
///
/// Only the panic hook is installed. No `tracing` subscriber runs in the
/// browser, so events from pixtool-core are dropped; a missed size target is
/// reported through `console.warn` by the encode and process bindings.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
