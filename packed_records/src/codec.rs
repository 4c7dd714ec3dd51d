//! Packing of `[x, y, z]` field triples under a runtime [`Shape`].
//!
//! Each record contributes its x bits, then y bits, then z bits, every field
//! low bit first. Records follow each other with no gap; only the last byte
//! of a buffer may carry padding, and padding bits are always zero.

use log::debug;

use crate::bit_ops::{BitReader, BitWriter, low_mask};
use crate::error::{PackedRecordsError, Result};
use crate::shape::Shape;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Packs `records` into a buffer of exactly `shape.byte_size(len)` bytes.
///
/// Field values are masked to their widths.
pub fn pack_fields<I>(shape: Shape, records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = [u64; 3]>,
    I::IntoIter: ExactSizeIterator,
{
    shape.validate()?;
    let records = records.into_iter();
    let count = records.len();
    let byte_len = shape.byte_size(count)?;

    let mut writer = BitWriter::new(byte_len);
    for fields in records {
        for ((_, width), value) in shape.fields().into_iter().zip(fields) {
            writer.write(value, width)?;
        }
    }

    debug!(
        "packed {} records of shape {} into {} bytes ({} padding bits)",
        count,
        shape,
        byte_len,
        byte_len * 8 - writer.bit_pos()
    );
    Ok(writer.finish())
}

/// Decodes the first `count` records of `bytes`, building each with `make`.
///
/// Bits after the last record are never read. Fails with `OutOfRange` when
/// `bytes` is shorter than `count` records, before decoding anything.
pub fn unpack_fields<T, F>(shape: Shape, bytes: &[u8], count: usize, mut make: F) -> Result<Vec<T>>
where
    F: FnMut([u64; 3]) -> T,
{
    shape.validate()?;
    let needed_bits = shape.bit_size(count)?;
    let available_bits = bytes.len().saturating_mul(8);
    if needed_bits > available_bits {
        return Err(PackedRecordsError::OutOfRange {
            needed_bits,
            available_bits,
        });
    }

    // Zero-width shapes pass the range check for any count.
    let mut out = Vec::<T>::new();
    out.try_reserve_exact(count)
        .map_err(|_| PackedRecordsError::SizeOverflow {
            count,
            width: shape.width(),
        })?;

    let mut reader = BitReader::new(bytes);
    for _ in 0..count {
        let x = reader.read(shape.nx)?;
        let y = reader.read(shape.ny)?;
        let z = reader.read(shape.nz)?;
        out.push(make([x, y, z]));
    }

    debug!(
        "unpacked {} records of shape {} from {} bytes",
        count,
        shape,
        bytes.len()
    );
    Ok(out)
}

/// Copies the bytes holding the first `count` records of `bytes`, with the
/// bits after the last record cleared.
///
/// The result equals what [`pack_fields`] produces for those records.
pub fn canonical_prefix(shape: Shape, bytes: &[u8], count: usize) -> Result<Vec<u8>> {
    let bits = shape.bit_size(count)?;
    let len = bits.div_ceil(8);
    if len > bytes.len() {
        return Err(PackedRecordsError::OutOfRange {
            needed_bits: bits,
            available_bits: bytes.len().saturating_mul(8),
        });
    }
    let mut out = bytes[..len].to_vec();
    let used = bits % 8;
    if let (Some(last), true) = (out.last_mut(), used != 0) {
        *last &= low_mask(used) as u8;
    }
    Ok(out)
}
