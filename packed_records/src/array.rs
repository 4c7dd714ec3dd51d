//! Ordered record sequences with a cached packed buffer.
//!
//! # Examples
//!
//! ## Pack and unpack
//!
//! ```rust
//! use packed_records::{Record, RecordArray};
//!
//! let mut array = RecordArray::<3, 2, 3>::new();
//! array.push(Record::new(0b101, 0b11, 0b010));
//! array.push(Record::new(0b001, 0b00, 0b111));
//!
//! let bytes = array.pack().unwrap().to_vec();
//! assert_eq!(bytes, [0b010_11_101, 0b111_00_001]);
//!
//! let restored = RecordArray::<3, 2, 3>::unpack(&bytes, 2).unwrap();
//! assert_eq!(restored, array);
//! ```
//!
//! ## Cache invalidation
//!
//! ```rust
//! use packed_records::{Record, RecordArray};
//!
//! let mut array: RecordArray<1, 1, 1> = (0..5).map(|i| Record::new(i, i >> 1, i >> 2)).collect();
//! assert!(array.packed().is_none());
//!
//! array.pack().unwrap();
//! assert!(array.is_synced());
//!
//! array.push(Record::new(1, 1, 1));
//! assert!(array.packed().is_none());
//! ```

use core::slice;

use log::trace;

use crate::codec;
use crate::dynamic::DynRecordArray;
use crate::error::{PackedRecordsError, Result};
use crate::record::Record;
use crate::shape::{Shape, Shaped};

#[cfg(not(feature = "std"))]
use alloc::vec::{self, Vec};
#[cfg(feature = "std")]
use std::vec;

/// Shape-erased view of a packable array.
pub trait PackedArray: Shaped {
    /// Number of records held.
    fn count(&self) -> usize;

    /// Bytes the records occupy once packed.
    fn byte_size(&self) -> Result<usize> {
        self.shape().byte_size(self.count())
    }

    /// Packed encoding of the current records. Does not touch any cache.
    fn packed_bytes(&self) -> Result<Vec<u8>>;
}

/// Records of shape `(NX, NY, NZ)` plus the buffer they were last packed into.
#[derive(Debug, Clone, Default)]
pub struct RecordArray<const NX: usize, const NY: usize, const NZ: usize> {
    records: Vec<Record<NX, NY, NZ>>,
    packed: Vec<u8>,
    synced: bool,
}

/// Array of records whose three fields share one width.
pub type UniformRecordArray<const N: usize> = RecordArray<N, N, N>;

impl<const NX: usize, const NY: usize, const NZ: usize> RecordArray<NX, NY, NZ> {
    pub const SHAPE: Shape = Record::<NX, NY, NZ>::SHAPE;

    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_records(Vec::with_capacity(capacity))
    }

    pub fn from_records(records: Vec<Record<NX, NY, NZ>>) -> Self {
        Self {
            records,
            packed: Vec::new(),
            synced: false,
        }
    }

    /// Bytes needed to pack `count` records of this shape.
    ///
    /// ```
    /// use packed_records::RecordArray;
    ///
    /// assert_eq!(RecordArray::<1, 1, 1>::byte_size_for(5).unwrap(), 2);
    /// assert_eq!(RecordArray::<3, 2, 3>::byte_size_for(2).unwrap(), 2);
    /// ```
    pub fn byte_size_for(count: usize) -> Result<usize> {
        Self::SHAPE.byte_size(count)
    }

    /// Bytes the current records occupy once packed.
    pub fn byte_size(&self) -> Result<usize> {
        Self::byte_size_for(self.records.len())
    }

    pub fn shape(&self) -> Shape {
        Self::SHAPE
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the cached buffer reflects the current records.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn get(&self, index: usize) -> Option<&Record<NX, NY, NZ>> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record<NX, NY, NZ>] {
        &self.records
    }

    /// Mutable access to the records. Invalidates the cached buffer.
    pub fn records_mut(&mut self) -> &mut Vec<Record<NX, NY, NZ>> {
        self.invalidate();
        &mut self.records
    }

    pub fn push(&mut self, record: Record<NX, NY, NZ>) {
        self.invalidate();
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.invalidate();
        self.records.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, Record<NX, NY, NZ>> {
        self.records.iter()
    }

    /// Packs the records, replacing the cached buffer.
    pub fn pack(&mut self) -> Result<&[u8]> {
        self.packed = codec::pack_fields(Self::SHAPE, self.records.iter().map(Record::fields))?;
        self.synced = true;
        Ok(&self.packed)
    }

    /// The cached buffer, if it reflects the current records.
    pub fn packed(&self) -> Option<&[u8]> {
        self.synced.then_some(self.packed.as_slice())
    }

    /// Packs the records and hands over the buffer.
    pub fn into_packed(mut self) -> Result<Vec<u8>> {
        if !self.synced {
            self.pack()?;
        }
        Ok(self.packed)
    }

    /// Decodes `count` records from `bytes` into a new array.
    ///
    /// Fails with `OutOfRange` if `bytes` is too short for `count` records.
    pub fn unpack(bytes: &[u8], count: usize) -> Result<Self> {
        let mut array = Self::new();
        array.unpack_into(bytes, count)?;
        Ok(array)
    }

    /// Decodes `count` records of shape `shape` from `bytes`.
    ///
    /// Fails with `ShapeMismatch` if `shape` is not this array's shape.
    pub fn unpack_shaped(shape: Shape, bytes: &[u8], count: usize) -> Result<Self> {
        Self::SHAPE.require(shape)?;
        Self::unpack(bytes, count)
    }

    /// Replaces the records with `count` records decoded from `bytes`.
    ///
    /// On error the array is left as it was.
    pub fn unpack_into(&mut self, bytes: &[u8], count: usize) -> Result<()> {
        let records = codec::unpack_fields(Self::SHAPE, bytes, count, |[x, y, z]| {
            Record::new(x, y, z)
        })?;
        self.packed = codec::canonical_prefix(Self::SHAPE, bytes, count)?;
        self.records = records;
        self.synced = true;
        Ok(())
    }

    /// Rebuilds `count` records from the buffer this array last packed or
    /// loaded.
    pub fn reload(&mut self, count: usize) -> Result<()> {
        let bytes = core::mem::take(&mut self.packed);
        let result = self.unpack_into(&bytes, count);
        if result.is_err() {
            self.packed = bytes;
        }
        result
    }

    /// Copies the records into a runtime-shaped array.
    ///
    /// Fails with `InvalidBitWidth` if a field of this shape is wider than
    /// 64 bits.
    pub fn to_dyn(&self) -> Result<DynRecordArray> {
        let mut array = DynRecordArray::new(Self::SHAPE)?;
        for r in &self.records {
            let [x, y, z] = r.fields();
            array.push_fields(x, y, z);
        }
        Ok(array)
    }

    /// Appends the records of another array of the same shape.
    ///
    /// Fails with `ShapeMismatch` when the shapes differ.
    pub fn extend_from(&mut self, other: &dyn PackedArray) -> Result<()> {
        Self::SHAPE.require(other.shape())?;
        let bytes = other.packed_bytes()?;
        let records = codec::unpack_fields(Self::SHAPE, &bytes, other.count(), |[x, y, z]| {
            Record::new(x, y, z)
        })?;
        self.extend(records);
        Ok(())
    }

    fn invalidate(&mut self) {
        if self.synced {
            trace!("packed buffer of {} records invalidated", self.records.len());
            self.synced = false;
        }
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> Shaped for RecordArray<NX, NY, NZ> {
    fn shape(&self) -> Shape {
        Self::SHAPE
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> PackedArray for RecordArray<NX, NY, NZ> {
    fn count(&self) -> usize {
        self.records.len()
    }

    fn packed_bytes(&self) -> Result<Vec<u8>> {
        match self.packed() {
            Some(bytes) => Ok(bytes.to_vec()),
            None => codec::pack_fields(Self::SHAPE, self.records.iter().map(Record::fields)),
        }
    }
}

/// Arrays are equal when their records are; the cache is ignored.
impl<const NX: usize, const NY: usize, const NZ: usize> PartialEq for RecordArray<NX, NY, NZ> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> Eq for RecordArray<NX, NY, NZ> {}

impl<const NX: usize, const NY: usize, const NZ: usize> TryFrom<&RecordArray<NX, NY, NZ>>
    for DynRecordArray
{
    type Error = PackedRecordsError;

    fn try_from(array: &RecordArray<NX, NY, NZ>) -> Result<Self> {
        array.to_dyn()
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> From<Vec<Record<NX, NY, NZ>>>
    for RecordArray<NX, NY, NZ>
{
    fn from(records: Vec<Record<NX, NY, NZ>>) -> Self {
        Self::from_records(records)
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> FromIterator<Record<NX, NY, NZ>>
    for RecordArray<NX, NY, NZ>
{
    fn from_iter<I: IntoIterator<Item = Record<NX, NY, NZ>>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> Extend<Record<NX, NY, NZ>>
    for RecordArray<NX, NY, NZ>
{
    fn extend<I: IntoIterator<Item = Record<NX, NY, NZ>>>(&mut self, iter: I) {
        self.invalidate();
        self.records.extend(iter);
    }
}

impl<'a, const NX: usize, const NY: usize, const NZ: usize> IntoIterator
    for &'a RecordArray<NX, NY, NZ>
{
    type Item = &'a Record<NX, NY, NZ>;
    type IntoIter = slice::Iter<'a, Record<NX, NY, NZ>>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> IntoIterator for RecordArray<NX, NY, NZ> {
    type Item = Record<NX, NY, NZ>;
    type IntoIter = vec::IntoIter<Record<NX, NY, NZ>>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
