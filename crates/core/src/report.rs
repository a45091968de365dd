//! Serializable run reports for visualizers.
//!
//! A [`RunReport`] carries everything a front end needs to replay a run:
//! the Huffman merge log and finished tree, the LZW step log and final
//! dictionary, and the size statistics of both. Each run builds its report
//! from scratch; nothing is shared between runs.
//!
//! Reports are self-checking. The CRC32 of the input is stored alongside the
//! logs, and [`RunReport::verify`] decodes each engine's output back and
//! compares checksums.

use crate::bitio::PackedBits;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::huffman::{
    build_from_frequencies, generate_codes, huffman_compressed_bits, CodeTable, HierarchyNode,
    HuffmanSnapshot, HuffmanTree,
};
use crate::lzw::{concat_phrases, encode_lzw, AlphabetConfig, ExpandedCode, LzwEncoding};
use crate::stats::CompressionStats;
use serde::Serialize;
use tracing::debug;

/// Everything produced by one Huffman run.
#[derive(Debug, Clone, Serialize)]
pub struct HuffmanReport {
    pub frequencies: FrequencyTable,
    pub snapshots: Vec<HuffmanSnapshot>,
    pub hierarchy: Option<HierarchyNode>,
    pub codes: CodeTable,
    pub stats: CompressionStats,
    pub payload: PackedBits,
    #[serde(skip)]
    pub tree: HuffmanTree,
}

impl HuffmanReport {
    pub fn from_input(input: &[u8]) -> Result<Self> {
        let frequencies = FrequencyTable::from_input(input);
        let build = build_from_frequencies(&frequencies);
        let codes = generate_codes(&build.tree);
        let compressed_bits = huffman_compressed_bits(&build.tree, &frequencies);
        let payload = codes.pack(input)?;

        Ok(Self {
            hierarchy: build.tree.hierarchy(),
            snapshots: build.snapshots,
            stats: CompressionStats::new(input.len(), compressed_bits),
            frequencies,
            codes,
            payload,
            tree: build.tree,
        })
    }

    /// Decode the packed payload with the tree.
    pub fn decode(&self) -> Result<Vec<u8>> {
        self.tree.decode(&self.payload)
    }
}

/// Everything produced by one LZW run.
///
/// The encoding's fields sit at the top level of the JSON object; steps carry
/// lengths into `output`, `final_dictionary` and `input` instead of copies.
#[derive(Debug, Clone, Serialize)]
pub struct LzwReport {
    #[serde(flatten)]
    pub encoding: LzwEncoding,
    pub expanded: Vec<ExpandedCode>,
    pub bits_per_code: Option<u32>,
    pub stats: CompressionStats,
}

impl LzwReport {
    pub fn from_input(input: &[u8], config: &AlphabetConfig) -> Result<Self> {
        let encoding = encode_lzw(input, config)?;
        let expanded = encoding.expand()?;

        Ok(Self {
            bits_per_code: encoding.bits_per_code(),
            stats: CompressionStats::new(input.len(), encoding.compressed_bits()),
            encoding,
            expanded,
        })
    }

    /// Concatenate the expanded phrases.
    pub fn decode(&self) -> Vec<u8> {
        concat_phrases(&self.expanded)
    }
}

/// Complete result of one run over one input.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input_len: usize,
    pub input_crc32: u32,
    pub huffman: Option<HuffmanReport>,
    pub lzw: Option<LzwReport>,
}

impl RunReport {
    /// Run the Huffman engine when `huffman` is set and the LZW engine when
    /// an alphabet is given.
    pub fn new(input: &[u8], huffman: bool, lzw: Option<&AlphabetConfig>) -> Result<Self> {
        let huffman = if huffman {
            Some(HuffmanReport::from_input(input)?)
        } else {
            None
        };
        let lzw = match lzw {
            Some(config) => Some(LzwReport::from_input(input, config)?),
            None => None,
        };

        debug!(
            input_len = input.len(),
            huffman = huffman.is_some(),
            lzw = lzw.is_some(),
            "run report built"
        );

        Ok(Self {
            input_len: input.len(),
            input_crc32: crc32fast::hash(input),
            huffman,
            lzw,
        })
    }

    /// Decode each engine's output and compare it with the input checksum.
    ///
    /// # Errors
    /// - `Error::Crc` if a decoded output differs from the input
    /// - decoding errors from the Huffman oracle
    pub fn verify(&self) -> Result<()> {
        if let Some(huffman) = &self.huffman {
            self.check(&huffman.decode()?)?;
        }
        if let Some(lzw) = &self.lzw {
            self.check(&lzw.decode())?;
        }
        Ok(())
    }

    fn check(&self, decoded: &[u8]) -> Result<()> {
        let actual = crc32fast::hash(decoded);
        if actual != self.input_crc32 {
            return Err(Error::Crc {
                expected: self.input_crc32,
                actual,
            });
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
