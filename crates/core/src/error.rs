//! Error types for the codec-viz engines.
//!
//! The encoders themselves have no recoverable failure modes: empty input,
//! a single distinct symbol and a zero-bit baseline are ordinary values.
//! Errors are reserved for misconfiguration (caught at call time) and for
//! the verification oracles that read packed data back.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: packing or decoding with a code table
/// - LZW: alphabet configuration, unencodable input, unknown codes
/// - CRC: a report failed its round-trip check
/// - Config / I/O: surfaces used by the command-line driver
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman packing or decoding error
    #[error("huffman error: {0}")]
    Huffman(#[from] HuffmanError),

    /// LZW configuration or encoding error
    #[error("lzw error: {0}")]
    Lzw(#[from] LzwError),

    /// Round-trip check of a report failed, indicating a corrupted log
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Report serialization failed
    #[error("report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman packing / decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// Input contains a symbol that has no code in the table
    #[error("symbol {symbol:#04x} has no code")]
    SymbolNotInTable { symbol: u8 },

    /// Bit stream walked off the tree or ended mid-code
    #[error("invalid huffman code at bit position {position}")]
    InvalidCode { position: usize },

    /// Decoding requested against a tree with no nodes
    #[error("cannot decode with an empty tree")]
    EmptyTree,
}

/// LZW configuration and encoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LzwError {
    /// Seed range contains no symbols
    #[error("seed range {start}..={end} is empty")]
    EmptySeedRange { start: u8, end: u8 },

    /// First learned code would collide with a seed code
    #[error("start code {start_code} must exceed the largest seed code {max_seed}")]
    StartCodeTooLow { start_code: u32, max_seed: u32 },

    /// Minimum code width cannot represent every seed code
    #[error("minimum code width {width} cannot represent seed code {max_seed}")]
    MinWidthTooSmall { width: u32, max_seed: u32 },

    /// Code width outside 1..=32 bits
    #[error("code width {0} is outside 1..=32")]
    InvalidCodeWidth(u32),

    /// Input byte is not part of the configured alphabet
    #[error("symbol {symbol:#04x} at position {position} is outside the seed alphabet")]
    SymbolOutsideAlphabet { symbol: u8, position: usize },

    /// Code does not exist in the dictionary
    #[error("code {0} is not in the dictionary")]
    UnknownCode(u32),

    /// Dictionary grew past the 32-bit code space
    #[error("dictionary exhausted the 32-bit code space")]
    CodeSpaceExhausted,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
