//! Adaptive LZW encoding with a per-miss step log.
//!
//! # Alphabets
//!
//! The dictionary starts with one entry per symbol of a seed range, each
//! coded by its own byte value. Learned phrases take consecutive codes from
//! `start_code` upward. Two presets exist and the caller must pick one:
//!
//! | Preset            | Seeds     | First learned code | Minimum width |
//! |-------------------|-----------|--------------------|---------------|
//! | `full_byte`       | 0..=255   | 256                | 8 bits        |
//! | `printable_ascii` | 32..=126  | 127                | 7 bits        |
//!
//! # Algorithm
//!
//! With `w` the current match and `c` the next symbol: if `w + c` is known
//! the match grows silently. Otherwise the code of `w` is emitted, `w + c`
//! is learned under the next code, one [`LzwStep`] is recorded and `w`
//! restarts at `c`. When input ends a non-empty `w` is flushed with one last
//! step that learns nothing.
//!
//! # Size
//!
//! Every emitted code is charged the same width: the bits needed for the
//! largest code emitted, never less than the preset's minimum width.

use crate::bitio::{BitReader, BitWriter, PackedBits};
use crate::error::{BitIoError, Error, LzwError, Result};
use crate::symbol::{serialize_opt_symbol, Phrase, Symbol};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::{debug, trace};

/// An LZW output code.
pub type Code = u32;

/// Bits needed to write `code` in binary (`ceil(log2(code + 1))`).
pub fn bit_width(code: Code) -> u32 {
    Code::BITS - code.leading_zeros()
}

/// Named alphabet choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    FullByte,
    PrintableAscii,
}

impl Preset {
    pub fn config(self) -> AlphabetConfig {
        match self {
            Preset::FullByte => AlphabetConfig::full_byte(),
            Preset::PrintableAscii => AlphabetConfig::printable_ascii(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::FullByte => "full-byte",
            Preset::PrintableAscii => "printable",
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full-byte" | "byte" => Ok(Preset::FullByte),
            "printable" | "printable-ascii" | "ascii" => Ok(Preset::PrintableAscii),
            other => Err(Error::Config(format!(
                "unknown alphabet '{other}' (expected full-byte or printable)"
            ))),
        }
    }
}

/// Seed alphabet and code numbering for one encoder run.
///
/// # Invariants
/// - the seed range is non-empty
/// - `start_code` exceeds every seed code
/// - `min_code_width` is in `1..=32` and can represent every seed code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlphabetConfig {
    seed_start: Symbol,
    seed_end: Symbol,
    start_code: Code,
    min_code_width: u32,
}

impl AlphabetConfig {
    /// Validate and build a configuration.
    ///
    /// # Errors
    /// - `LzwError::EmptySeedRange` if the range holds no symbols
    /// - `LzwError::StartCodeTooLow` if `start_code` is not above the last seed
    /// - `LzwError::InvalidCodeWidth` if `min_code_width` is outside `1..=32`
    /// - `LzwError::MinWidthTooSmall` if the width cannot hold the last seed
    pub fn new(seed_range: RangeInclusive<Symbol>, start_code: Code, min_code_width: u32) -> Result<Self> {
        let (start, end) = (*seed_range.start(), *seed_range.end());
        if seed_range.is_empty() {
            return Err(LzwError::EmptySeedRange { start, end }.into());
        }

        let max_seed = Code::from(end);
        if start_code <= max_seed {
            return Err(LzwError::StartCodeTooLow {
                start_code,
                max_seed,
            }
            .into());
        }
        if !(1..=Code::BITS).contains(&min_code_width) {
            return Err(LzwError::InvalidCodeWidth(min_code_width).into());
        }
        if bit_width(max_seed) > min_code_width {
            return Err(LzwError::MinWidthTooSmall {
                width: min_code_width,
                max_seed,
            }
            .into());
        }

        Ok(Self {
            seed_start: start,
            seed_end: end,
            start_code,
            min_code_width,
        })
    }

    /// Every byte value is a seed; learned codes start at 256.
    pub fn full_byte() -> Self {
        Self {
            seed_start: 0,
            seed_end: 255,
            start_code: 256,
            min_code_width: 8,
        }
    }

    /// Space through tilde are seeds; learned codes start at 127.
    pub fn printable_ascii() -> Self {
        Self {
            seed_start: 32,
            seed_end: 126,
            start_code: 127,
            min_code_width: 7,
        }
    }

    pub fn seed_range(&self) -> RangeInclusive<Symbol> {
        self.seed_start..=self.seed_end
    }

    pub fn start_code(&self) -> Code {
        self.start_code
    }

    pub fn min_code_width(&self) -> u32 {
        self.min_code_width
    }

    pub fn seed_count(&self) -> usize {
        self.seed_range().count()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.seed_range().contains(&symbol)
    }

    /// Width charged per code when `max_code` is the largest code emitted.
    pub fn bits_per_code(&self, max_code: Code) -> u32 {
        self.min_code_width.max(bit_width(max_code))
    }
}

/// One dictionary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryEntry {
    pub phrase: Phrase,
    pub code: Code,
}

/// Phrase ↔ code table that only ever grows.
///
/// Entries are kept in insertion order, which is also ascending code order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LzwDictionary {
    entries: Vec<DictionaryEntry>,
    lookup: HashMap<Phrase, Code>,
    seed_start: Code,
    seed_count: usize,
    start_code: Code,
    next_code: Code,
}

impl LzwDictionary {
    /// Dictionary holding only the seed alphabet of `config`.
    pub fn seeded(config: &AlphabetConfig) -> Self {
        let mut dict = Self {
            entries: Vec::with_capacity(config.seed_count()),
            lookup: HashMap::with_capacity(config.seed_count()),
            seed_start: Code::from(config.seed_start),
            seed_count: config.seed_count(),
            start_code: config.start_code,
            next_code: config.start_code,
        };
        for symbol in config.seed_range() {
            let phrase = Phrase::single(symbol);
            dict.lookup.insert(phrase.clone(), Code::from(symbol));
            dict.entries.push(DictionaryEntry {
                phrase,
                code: Code::from(symbol),
            });
        }
        dict
    }

    /// Code of `phrase`, if known.
    pub fn code_of(&self, phrase: &[Symbol]) -> Option<Code> {
        self.lookup.get(phrase).copied()
    }

    /// Phrase stored under `code`, if any.
    pub fn phrase_of(&self, code: Code) -> Option<&Phrase> {
        let index = if code >= self.start_code {
            self.seed_count + (code - self.start_code) as usize
        } else {
            let offset = code.checked_sub(self.seed_start)? as usize;
            if offset >= self.seed_count {
                return None;
            }
            offset
        };
        self.entries.get(index).map(|entry| &entry.phrase)
    }

    /// Learn `phrase` under the next free code.
    fn learn(&mut self, phrase: Phrase) -> Result<Code> {
        let code = self.next_code;
        self.next_code = code.checked_add(1).ok_or(LzwError::CodeSpaceExhausted)?;
        self.lookup.insert(phrase.clone(), code);
        self.entries.push(DictionaryEntry { phrase, code });
        Ok(code)
    }

    /// Rows in insertion (and code) order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries learned beyond the seeds.
    pub fn learned_len(&self) -> usize {
        self.entries.len() - self.seed_count
    }

    /// Code the next learned phrase would receive.
    pub fn next_code(&self) -> Code {
        self.next_code
    }
}

impl Serialize for LzwDictionary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// State captured at one miss event or at the final flush.
///
/// The output, dictionary and input only ever grow or shrink from one end,
/// so a step records how far each had got. [`LzwEncoding::output_at`],
/// [`LzwEncoding::dictionary_at`] and [`LzwEncoding::remaining_input_at`]
/// turn those lengths back into slices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LzwStep {
    /// 1-based position in the step log
    pub ordinal: usize,
    /// Longest known match before `current_symbol`
    pub matched_prefix: Phrase,
    /// Symbol that broke the match; `None` on the flush step
    #[serde(serialize_with = "serialize_opt_symbol")]
    pub current_symbol: Option<Symbol>,
    /// Code written for `matched_prefix`
    pub emitted_code: Code,
    /// Phrase learned at this step; `None` on the flush step
    pub new_entry: Option<DictionaryEntry>,
    /// Output codes written so far, this step's included
    pub output_len: usize,
    /// Dictionary entries after this step
    pub dictionary_len: usize,
    /// Input bytes consumed so far
    pub consumed: usize,
}

impl LzwStep {
    pub fn is_flush(&self) -> bool {
        self.new_entry.is_none()
    }
}

/// Result of [`encode_lzw`].
#[derive(Debug, Clone, Serialize)]
pub struct LzwEncoding {
    #[serde(rename = "alphabet")]
    pub config: AlphabetConfig,
    pub input: Phrase,
    pub steps: Vec<LzwStep>,
    pub final_dictionary: LzwDictionary,
    pub output: Vec<Code>,
}

impl LzwEncoding {
    /// Width charged per emitted code, or `None` for empty output.
    pub fn bits_per_code(&self) -> Option<u32> {
        self.output
            .iter()
            .max()
            .map(|&max| self.config.bits_per_code(max))
    }

    pub fn compressed_bits(&self) -> u64 {
        lzw_compressed_bits(&self.output, &self.config)
    }

    pub fn expand(&self) -> Result<Vec<ExpandedCode>> {
        expand_output(&self.output, &self.final_dictionary)
    }

    /// Pack the output at [`Self::bits_per_code`] bits per code.
    pub fn pack(&self) -> Result<PackedBits> {
        match self.bits_per_code() {
            Some(width) => pack_codes(&self.output, width),
            None => Ok(PackedBits::default()),
        }
    }

    /// Output codes written up to and including `step`.
    pub fn output_at(&self, step: &LzwStep) -> &[Code] {
        &self.output[..step.output_len.min(self.output.len())]
    }

    /// Dictionary as it stood right after `step`.
    pub fn dictionary_at(&self, step: &LzwStep) -> &[DictionaryEntry] {
        let entries = self.final_dictionary.entries();
        &entries[..step.dictionary_len.min(entries.len())]
    }

    /// Input not yet consumed after `step`.
    pub fn remaining_input_at(&self, step: &LzwStep) -> &[Symbol] {
        let input = self.input.as_bytes();
        &input[step.consumed.min(input.len())..]
    }
}

/// Encode `input` against the seed alphabet of `config`.
///
/// # Errors
/// `LzwError::SymbolOutsideAlphabet` if any byte is not a seed of `config`;
/// the input is checked before any step is recorded.
pub fn encode_lzw(input: &[u8], config: &AlphabetConfig) -> Result<LzwEncoding> {
    if let Some(position) = input.iter().position(|&b| !config.contains(b)) {
        return Err(LzwError::SymbolOutsideAlphabet {
            symbol: input[position],
            position,
        }
        .into());
    }

    let mut dict = LzwDictionary::seeded(config);
    let mut steps: Vec<LzwStep> = Vec::new();
    let mut output: Vec<Code> = Vec::new();

    if let Some(&first) = input.first() {
        // Seed codes equal byte values, so a one-symbol match is always known
        let mut matched: Vec<Symbol> = vec![first];
        let mut matched_code = Code::from(first);

        for (position, &symbol) in input.iter().enumerate().skip(1) {
            matched.push(symbol);
            if let Some(code) = dict.code_of(&matched) {
                matched_code = code;
                continue;
            }

            // Miss: `matched` minus `symbol` is the longest known prefix
            let added = Phrase::from(matched.as_slice());
            matched.pop();
            output.push(matched_code);

            let added_code = dict.learn(added.clone())?;
            debug!(
                prefix = %Phrase::from(matched.as_slice()),
                emitted = matched_code,
                added = %added,
                added_code,
                "lzw miss"
            );

            steps.push(LzwStep {
                ordinal: steps.len() + 1,
                matched_prefix: Phrase::from(matched.as_slice()),
                current_symbol: Some(symbol),
                emitted_code: matched_code,
                new_entry: Some(DictionaryEntry {
                    phrase: added,
                    code: added_code,
                }),
                output_len: output.len(),
                dictionary_len: dict.len(),
                consumed: position + 1,
            });

            matched.clear();
            matched.push(symbol);
            matched_code = Code::from(symbol);
        }

        output.push(matched_code);
        trace!(prefix = %Phrase::from(matched.as_slice()), emitted = matched_code, "lzw flush");

        steps.push(LzwStep {
            ordinal: steps.len() + 1,
            matched_prefix: Phrase::from(matched),
            current_symbol: None,
            emitted_code: matched_code,
            new_entry: None,
            output_len: output.len(),
            dictionary_len: dict.len(),
            consumed: input.len(),
        });
    }

    debug!(
        input_len = input.len(),
        codes = output.len(),
        learned = dict.learned_len(),
        "lzw encoding finished"
    );

    Ok(LzwEncoding {
        config: config.clone(),
        input: Phrase::from(input),
        steps,
        final_dictionary: dict,
        output,
    })
}

/// Total size in bits of `output` under `config`'s width floor.
///
/// Returns 0 for empty output.
pub fn lzw_compressed_bits(output: &[Code], config: &AlphabetConfig) -> u64 {
    match output.iter().max() {
        Some(&max) => output.len() as u64 * u64::from(config.bits_per_code(max)),
        None => 0,
    }
}

/// An output code paired with the phrase it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedCode {
    pub code: Code,
    pub phrase: Phrase,
}

/// Look every code of `output` up in `dictionary`.
///
/// Concatenating the phrases reproduces the encoder's input.
///
/// # Errors
/// `LzwError::UnknownCode` for a code the dictionary does not hold.
pub fn expand_output(output: &[Code], dictionary: &LzwDictionary) -> Result<Vec<ExpandedCode>> {
    output
        .iter()
        .map(|&code| {
            let phrase = dictionary
                .phrase_of(code)
                .ok_or(LzwError::UnknownCode(code))?;
            Ok(ExpandedCode {
                code,
                phrase: phrase.clone(),
            })
        })
        .collect()
}

/// Concatenate expanded phrases back into bytes.
pub fn concat_phrases(expanded: &[ExpandedCode]) -> Vec<Symbol> {
    expanded
        .iter()
        .flat_map(|entry| entry.phrase.as_bytes().iter().copied())
        .collect()
}

/// Write each code in exactly `width` bits, MSB-first.
///
/// Codes wider than `width` are truncated to their low bits.
///
/// # Errors
/// `LzwError::InvalidCodeWidth` if `width` is outside `1..=32`.
pub fn pack_codes(output: &[Code], width: u32) -> Result<PackedBits> {
    if !(1..=Code::BITS).contains(&width) {
        return Err(LzwError::InvalidCodeWidth(width).into());
    }
    let mut writer = BitWriter::new();
    for &code in output {
        writer.write_bits(u64::from(code), width as usize)?;
    }
    Ok(writer.finish())
}

/// Read fixed-width codes until the payload is exhausted.
///
/// # Errors
/// - `LzwError::InvalidCodeWidth` if `width` is outside `1..=32`
/// - `BitIoError::UnexpectedEof` if the payload ends inside a code
pub fn unpack_codes(packed: &PackedBits, width: u32) -> Result<Vec<Code>> {
    if !(1..=Code::BITS).contains(&width) {
        return Err(LzwError::InvalidCodeWidth(width).into());
    }
    if packed.bit_len() % u64::from(width) != 0 {
        return Err(BitIoError::UnexpectedEof.into());
    }
    let mut reader = BitReader::new(packed);
    let mut codes = Vec::with_capacity((packed.bit_len() / u64::from(width)) as usize);
    while !reader.is_empty() {
        codes.push(reader.read_bits(width as usize)? as Code);
    }
    Ok(codes)
}
