//! Compressed-size statistics.
//!
//! Both engines are measured against the same baseline: eight bits per
//! input byte. For empty input the baseline is zero and ratios are not
//! applicable, which is reported as `None` instead of dividing by zero.

use serde::Serialize;
use std::fmt;

/// Bits one uncompressed symbol occupies.
pub const BITS_PER_SYMBOL: u64 = 8;

/// Size of one engine's output next to the uncompressed baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionStats {
    /// Input length in bytes
    pub input_bytes: u64,

    /// `input_bytes × 8`
    pub baseline_bits: u64,

    /// Bits the engine's output occupies
    pub compressed_bits: u64,
}

impl CompressionStats {
    pub fn new(input_len: usize, compressed_bits: u64) -> Self {
        let input_bytes = input_len as u64;
        Self {
            input_bytes,
            baseline_bits: input_bytes * BITS_PER_SYMBOL,
            compressed_bits,
        }
    }

    /// Compressed / baseline, or `None` when the baseline is zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.baseline_bits == 0 {
            None
        } else {
            Some(self.compressed_bits as f64 / self.baseline_bits as f64)
        }
    }

    /// Percentage of the baseline saved, or `None` when the baseline is zero.
    ///
    /// Negative when the output is larger than the input.
    pub fn reduction_percent(&self) -> Option<f64> {
        self.ratio().map(|ratio| (1.0 - ratio) * 100.0)
    }

    /// Bytes needed to hold the compressed bits.
    pub fn compressed_bytes(&self) -> u64 {
        self.compressed_bits.div_ceil(8)
    }

    /// Baseline minus compressed size, in bits.
    pub fn saved_bits(&self) -> i64 {
        self.baseline_bits as i64 - self.compressed_bits as i64
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "input_bytes={}\n\
             baseline_bits={}\n\
             compressed_bits={}\n\
             reduction_percent={}\n",
            self.input_bytes,
            self.baseline_bits,
            self.compressed_bits,
            format_percent(self.reduction_percent()),
        )
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bits (baseline {} bits, reduction {})",
            self.compressed_bits,
            self.baseline_bits,
            format_percent(self.reduction_percent())
        )
    }
}

/// `"37.50%"` or `"n/a"`.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{p:.2}%"),
        None => "n/a".to_string(),
    }
}
