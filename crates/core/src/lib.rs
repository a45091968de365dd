//! codec-viz-core: Huffman and LZW encoders that log every step
//!
//! This library computes real compressed encodings of a byte sequence and
//! records how each encoder got there, so a front end can replay the run:
//! - Huffman: one snapshot of the active node set per merge
//! - LZW: one record per dictionary miss, plus the final flush
//! - Both: compressed size against an 8-bits-per-byte baseline
//!
//! # Architecture
//!
//! - `frequency`: first-occurrence ordered symbol counts
//! - `huffman`: tree builder, code generator, size calculator, decoding oracle
//! - `lzw`: alphabet presets, encoder, size calculator, output expander
//! - `bitio`: MSB-first bit packing for both payloads
//! - `stats`: compressed size versus the uncompressed baseline
//! - `report`: serializable, self-verifying run reports
//!
//! # Design Principles
//!
//! - **Deterministic**: ties are broken by creation order, never by
//!   container iteration order, so logs are identical across runs
//! - **Append-only**: snapshots, steps, tree nodes and dictionary entries
//!   are never modified once recorded
//! - **Stateless**: every call builds its structures from scratch
//!
//! # Example
//! ```
//! use codec_viz_core::{build_huffman, encode_lzw, generate_codes, AlphabetConfig};
//!
//! let build = build_huffman(b"AAAB");
//! let codes = generate_codes(&build.tree);
//! assert_eq!(codes.get(b'A'), Some("1"));
//!
//! let lzw = encode_lzw(b"AAAB", &AlphabetConfig::full_byte()).unwrap();
//! assert_eq!(lzw.output, vec![65, 256, 66]);
//! ```

pub mod bitio;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod lzw;
pub mod report;
pub mod stats;
pub mod symbol;

// Re-export commonly used types
pub use error::{Error, Result};
pub use frequency::{compute_frequencies, FrequencyTable};
pub use huffman::{
    build_from_frequencies, build_huffman, generate_codes, huffman_compressed_bits, CodeTable,
    HuffmanBuild, HuffmanSnapshot, HuffmanTree,
};
pub use lzw::{
    encode_lzw, expand_output, lzw_compressed_bits, AlphabetConfig, Code, LzwEncoding, LzwStep,
    Preset,
};
pub use report::RunReport;
pub use stats::CompressionStats;
pub use symbol::{Phrase, Symbol};
