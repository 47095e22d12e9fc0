//! Whole-file operations behind the compressor and resizer tools.
//!
//! # Example
//!
//! ```typescript
//! import { compress_image, resize_image, JsBatch } from '@pixtool/wasm';
//!
//! const out = compress_image(file.name, bytes, 80, 200);
//! const resized = resize_image(file.name, bytes, { width: 800, fitMode: 'fill', format: 'webp' });
//!
//! const batch = new JsBatch();
//! for (const f of files) batch.add(f.name, new Uint8Array(await f.arrayBuffer()));
//! const report = batch.compress(80, 200, (done, total) => {
//!   progressBar.value = done / total;
//!   return !cancelRequested; // returning false stops the batch
//! });
//! ```

use js_sys::{Array, Function};
use pixtool_core::naming;
use pixtool_core::pipeline::{
    self, BatchOperation, BatchProgress, BatchReport, CancelFlag, InputFile, ProcessOptions,
};
use wasm_bindgen::prelude::*;

use crate::encode::warn_overshoot;
use crate::types::JsProcessedImage;

/// Compress an upload to JPEG, optionally to a target size in KB.
///
/// `quality` (1-100) is the ceiling; the output is named `stem_compressed.jpg`.
#[wasm_bindgen]
pub fn compress_image(
    name: &str,
    bytes: &[u8],
    quality: u8,
    target_kb: Option<f64>,
) -> Result<JsProcessedImage, JsValue> {
    let processed = pipeline::compress_image(name, bytes, quality, target_kb)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    if processed.overshoot {
        warn_overshoot(target_kb.unwrap_or_default(), processed.size() as f64 / 1024.0);
    }
    Ok(processed.into())
}

/// Resize an upload and encode it.
///
/// `options` is a plain object: `{ width?, height?, scale?, keepAspect?,
/// fitMode?, filter?, format?, quality?, targetKb? }`. Missing fields take
/// their defaults; `undefined` uses all defaults.
#[wasm_bindgen]
pub fn resize_image(
    name: &str,
    bytes: &[u8],
    options: JsValue,
) -> Result<JsProcessedImage, JsValue> {
    let options = parse_options(options)?;
    let processed = pipeline::resize_image(name, bytes, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    if processed.overshoot {
        warn_overshoot(
            options.target_kb.unwrap_or_default(),
            processed.size() as f64 / 1024.0,
        );
    }
    Ok(processed.into())
}

/// Format a byte count for display: `1536` → `"1.5 KB"`.
#[wasm_bindgen]
pub fn format_bytes(bytes: f64, decimals: u8) -> String {
    naming::format_bytes(bytes.max(0.0) as u64, decimals as usize)
}

fn parse_options(options: JsValue) -> Result<ProcessOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ProcessOptions::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Files queued for one batch run.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsBatch {
    files: Vec<InputFile>,
}

#[wasm_bindgen]
impl JsBatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsBatch {
        JsBatch::default()
    }

    /// Queue a file. Bytes are copied into WASM memory.
    pub fn add(&mut self, name: String, bytes: Vec<u8>) {
        self.files.push(InputFile::new(name, bytes));
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Compress every queued file.
    ///
    /// `progress(done, total)` is called after each file; returning `false`
    /// cancels the remaining files.
    pub fn compress(
        &self,
        quality: u8,
        target_kb: Option<f64>,
        progress: Option<Function>,
    ) -> JsBatchReport {
        self.run(BatchOperation::Compress { quality, target_kb }, progress)
    }

    /// Resize every queued file with the same options.
    pub fn resize(
        &self,
        options: JsValue,
        progress: Option<Function>,
    ) -> Result<JsBatchReport, JsValue> {
        let options = parse_options(options)?;
        Ok(self.run(BatchOperation::Resize(options), progress))
    }
}

impl JsBatch {
    fn run(&self, operation: BatchOperation, progress: Option<Function>) -> JsBatchReport {
        let cancel = CancelFlag::new();
        let report = pipeline::process_batch(&self.files, operation, &cancel, |step| {
            if let Some(callback) = &progress {
                if !keep_going(callback, step) {
                    cancel.cancel();
                }
            }
        });
        report.into()
    }
}

/// Calls the progress callback; an explicit `false` or a thrown error stops the batch.
fn keep_going(callback: &Function, step: BatchProgress) -> bool {
    let done = JsValue::from_f64(step.done as f64);
    let total = JsValue::from_f64(step.total as f64);
    match callback.call2(&JsValue::NULL, &done, &total) {
        Ok(value) => value.as_bool() != Some(false),
        Err(_) => false,
    }
}

/// Outcome of a batch run.
#[wasm_bindgen]
pub struct JsBatchReport {
    processed: Vec<pipeline::ProcessedImage>,
    failures: Vec<String>,
    cancelled: bool,
    overshoots: usize,
}

#[wasm_bindgen]
impl JsBatchReport {
    /// Processed files as an array of `JsProcessedImage`, in input order.
    pub fn results(&self) -> Array {
        self.processed
            .iter()
            .cloned()
            .map(|p| JsValue::from(JsProcessedImage::from(p)))
            .collect()
    }

    /// One "name: reason" message per failed file.
    pub fn failures(&self) -> Array {
        self.failures.iter().map(|f| JsValue::from_str(f)).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of files that could not meet the size target.
    #[wasm_bindgen(getter)]
    pub fn overshoots(&self) -> usize {
        self.overshoots
    }

    #[wasm_bindgen(getter)]
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}

impl From<BatchReport> for JsBatchReport {
    fn from(report: BatchReport) -> Self {
        let overshoots = report.overshoot_count();
        Self {
            failures: report
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.name, f.error))
                .collect(),
            processed: report.processed,
            cancelled: report.cancelled,
            overshoots,
        }
    }
}
