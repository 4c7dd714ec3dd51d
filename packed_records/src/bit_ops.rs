//! Bit-level access to byte slices.
//!
//! Bit `i` of a slice lives in byte `i / 8` at position `i % 8`, so the first
//! bit written into a byte is its least significant bit.

use crate::error::{PackedRecordsError, Result};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Mask covering the low `width` bits. `width` may be 64.
#[inline]
pub const fn low_mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

// slow but hopefully correct version
pub fn set_bits(slice: &mut [u8], bit_offset: usize, bit_width: usize, value: u64) {
    let masked = value & low_mask(bit_width);

    for i in 0..bit_width {
        let bit = (masked >> i) & 1;
        let pos = bit_offset + i;
        let byte = pos / 8;
        let bit_in_byte = pos % 8;

        if bit == 1 {
            slice[byte] |= 1 << bit_in_byte;
        } else {
            slice[byte] &= !(1 << bit_in_byte);
        }
    }
}

pub fn get_bits(slice: &[u8], bit_offset: usize, bit_width: usize) -> u64 {
    let mut value = 0u64;

    for i in 0..bit_width {
        let pos = bit_offset + i;
        let byte = pos / 8;
        let bit_in_byte = pos % 8;

        let bit = (slice[byte] >> bit_in_byte) & 1;
        value |= (bit as u64) << i;
    }

    value
}

/// Appends fields to a zero-initialised buffer of fixed length.
#[derive(Debug)]
pub struct BitWriter {
    buf: Vec<u8>,
    bit_pos: usize,
}

impl BitWriter {
    pub fn new(byte_len: usize) -> Self {
        Self {
            buf: vec![0u8; byte_len],
            bit_pos: 0,
        }
    }

    pub fn bit_pos(&self) -> usize {
        self.bit_pos
    }

    pub fn write(&mut self, value: u64, bit_width: usize) -> Result<()> {
        let available_bits = self.buf.len() * 8;
        let needed_bits = self.bit_pos + bit_width;
        if needed_bits > available_bits {
            return Err(PackedRecordsError::OutOfRange {
                needed_bits,
                available_bits,
            });
        }
        set_bits(&mut self.buf, self.bit_pos, bit_width, value);
        self.bit_pos = needed_bits;
        Ok(())
    }

    /// Returns the buffer. Bits past the write cursor stay zero.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads fields sequentially from a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    slice: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, bit_pos: 0 }
    }

    pub fn remaining_bits(&self) -> usize {
        self.slice.len() * 8 - self.bit_pos
    }

    pub fn read(&mut self, bit_width: usize) -> Result<u64> {
        if bit_width > self.remaining_bits() {
            return Err(PackedRecordsError::OutOfRange {
                needed_bits: self.bit_pos + bit_width,
                available_bits: self.slice.len() * 8,
            });
        }
        let value = get_bits(self.slice, self.bit_pos, bit_width);
        self.bit_pos += bit_width;
        Ok(value)
    }
}
