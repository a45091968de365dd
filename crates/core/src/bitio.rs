//! Bit-level packing for compressed payloads.
//!
//! Huffman codes and fixed-width LZW codes are both written MSB-first into a
//! [`PackedBits`] buffer. Unlike a bare byte vector, `PackedBits` remembers
//! its exact bit length, so readers stop at the last real bit instead of
//! running into the zero padding of the final byte.
//!
//! # Example
//! ```
//! use codec_viz_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! let packed = writer.finish();
//! assert_eq!(packed.bit_len(), 5);
//! assert_eq!(packed.as_bytes(), &[0b1011_1000]);
//!
//! let mut reader = BitReader::new(&packed);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! assert!(reader.is_empty());
//! ```

use crate::error::{BitIoError, Result};
use serde::Serialize;

/// Bytes plus the number of meaningful bits in them.
///
/// # Invariants
/// - `bytes.len() == bit_len.div_ceil(8)`
/// - padding bits in the last byte are zero
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PackedBits {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl PackedBits {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of meaningful bits.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Number of bytes including the padded tail.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Appends bits MSB-first.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Total bits written; the low three bits give the fill of the last byte
    bit_len: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        let offset = (self.bit_len % 8) as u32;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }

    /// Append the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` if `count > 64`.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }
        Ok(())
    }

    /// Append a code given as a string of `'0'` / `'1'` characters.
    ///
    /// Any character other than `'1'` is written as a zero bit; code strings
    /// come from [`crate::huffman::CodeTable`] and only contain the two digits.
    pub fn write_code(&mut self, code: &str) {
        for digit in code.bytes() {
            self.write_bit(digit == b'1');
        }
    }

    /// Total number of bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn finish(self) -> PackedBits {
        PackedBits {
            bytes: self.bytes,
            bit_len: self.bit_len,
        }
    }
}

/// Reads bits MSB-first from a [`PackedBits`] buffer.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    packed: &'a PackedBits,
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(packed: &'a PackedBits) -> Self {
        Self {
            packed,
            position: 0,
        }
    }

    /// Read one bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once every meaningful bit has been read.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.packed.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.packed.bytes[(self.position / 8) as usize];
        let bit = byte & (0x80 >> (self.position % 8)) != 0;
        self.position += 1;
        Ok(bit)
    }

    /// Read `count` bits into the low end of a `u64`.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if `count > 64`
    /// - `BitIoError::UnexpectedEof` if fewer than `count` bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count as u64 > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value)
    }

    pub fn bits_remaining(&self) -> u64 {
        self.packed.bit_len - self.position
    }

    /// Current bit position from the start of the buffer.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.packed.bit_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_write_code_strings() {
        let mut writer = BitWriter::new();
        writer.write_code("0");
        writer.write_code("10");
        writer.write_code("111");
        let packed = writer.finish();

        assert_eq!(packed.bit_len(), 6);
        assert_eq!(packed.as_bytes(), &[0b0101_1100]);
    }

    #[test]
    fn test_fixed_width_across_bytes() {
        let mut writer = BitWriter::new();
        writer.write_bits(256, 9).unwrap();
        writer.write_bits(65, 9).unwrap();
        let packed = writer.finish();
        assert_eq!(packed.bit_len(), 18);
        assert_eq!(packed.byte_len(), 3);

        let mut reader = BitReader::new(&packed);
        assert_eq!(reader.read_bits(9).unwrap(), 256);
        assert_eq!(reader.read_bits(9).unwrap(), 65);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_reader_stops_at_bit_len_not_padding() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        let packed = writer.finish();
        assert_eq!(packed.as_bytes(), &[0b1000_0000]);

        let mut reader = BitReader::new(&packed);
        assert!(reader.read_bit().unwrap());
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_invalid_bit_count() {
        let mut writer = BitWriter::new();
        assert!(writer.write_bits(0, 65).is_err());

        let packed = PackedBits::default();
        let mut reader = BitReader::new(&packed);
        assert!(reader.read_bits(65).is_err());
        assert_eq!(reader.read_bits(0).unwrap(), 0);
    }

    #[test]
    fn test_64_bit_values() {
        let mut writer = BitWriter::new();
        let val = 0x123456789ABCDEF0u64;
        writer.write_bits(val, 64).unwrap();

        let packed = writer.finish();
        let mut reader = BitReader::new(&packed);
        assert_eq!(reader.read_bits(64).unwrap(), val);
    }

    #[test]
    fn test_bits_remaining() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFFFF, 16).unwrap();
        let packed = writer.finish();
        let mut reader = BitReader::new(&packed);

        assert_eq!(reader.bits_remaining(), 16);
        reader.read_bits(5).unwrap();
        assert_eq!(reader.bits_remaining(), 11);
        assert_eq!(reader.position(), 5);
        reader.read_bits(11).unwrap();
        assert!(reader.is_empty());
    }
}
