//! Output file naming and human-readable sizes.

use crate::encode::OutputFormat;

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Replace the extension of `filename` with `suffix`.
///
/// Everything from the last `.` is dropped; names without a dot get the
/// suffix appended.
///
/// ```ignore
/// assert_eq!(filename_with_suffix("cat.png", "-resized.jpg"), "cat-resized.jpg");
/// ```
pub fn filename_with_suffix(filename: &str, suffix: &str) -> String {
    match filename.rfind('.') {
        Some(dot) => format!("{}{}", &filename[..dot], suffix),
        None => format!("{filename}{suffix}"),
    }
}

/// Name for a resizer output: `stem-resized.<ext>`.
pub fn resized_name(filename: &str, format: OutputFormat) -> String {
    filename_with_suffix(filename, &format!("-resized.{}", format.extension()))
}

/// Name for a compressor output: `stem_compressed.jpg`.
pub fn compressed_name(filename: &str) -> String {
    filename_with_suffix(filename, "_compressed.jpg")
}

/// Format a byte count with binary units, trimming trailing zeros.
///
/// `0` → `"0 B"`, `1536` → `"1.5 KB"`, `2097152` → `"2 MB"`.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }

    format!("{text} {}", UNITS[unit])
}

/// Percentage saved going from `before` to `after` bytes (negative if it grew).
pub fn reduction_percent(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (1.0 - after as f64 / before as f64) * 100.0
}
