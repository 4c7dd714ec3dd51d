//! Records and arrays whose shape is only known at runtime.
//!
//! Both use the same layout as their const-generic counterparts, so a buffer
//! packed by a `RecordArray<3, 2, 3>` unpacks into a `DynRecordArray` of shape
//! `(3, 2, 3)` and back.
//!
//! ```rust
//! use packed_records::{DynRecordArray, Shape};
//!
//! let shape = Shape::new(4, 4, 8);
//! let mut array = DynRecordArray::new(shape).unwrap();
//! array.push_fields(0xA, 0xB, 0xCD);
//!
//! let bytes = array.pack().unwrap();
//! assert_eq!(bytes, [0xBA, 0xCD]);
//!
//! let typed = DynRecordArray::unpack(shape, &bytes, 1)
//!     .unwrap()
//!     .to_typed::<4, 4, 8>()
//!     .unwrap();
//! assert_eq!(typed.records()[0].z(), 0xCD);
//! ```

use crate::array::{PackedArray, RecordArray};
use crate::bit_ops::{get_bits, low_mask, set_bits};
use crate::codec;
use crate::error::{PackedRecordsError, Result};
use crate::record::{OverflowPolicy, Record, fit};
use crate::shape::{Field, Shape, Shaped};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// A record carrying its own shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DynRecord {
    shape: Shape,
    fields: [u64; 3],
}

impl DynRecord {
    /// Builds a record, keeping only the low bits of each value.
    pub fn new(shape: Shape, x: u64, y: u64, z: u64) -> Result<Self> {
        Self::with_policy(shape, OverflowPolicy::Truncate, x, y, z)
    }

    pub fn with_policy(
        shape: Shape,
        policy: OverflowPolicy,
        x: u64,
        y: u64,
        z: u64,
    ) -> Result<Self> {
        shape.validate()?;
        Ok(Self {
            shape,
            fields: [
                fit(Field::X, shape.nx, x, policy)?,
                fit(Field::Y, shape.ny, y, policy)?,
                fit(Field::Z, shape.nz, z, policy)?,
            ],
        })
    }

    /// Splits the first `shape.width()` bits of `bytes` into x, y and z.
    pub fn from_packed(shape: Shape, bytes: &[u8]) -> Result<Self> {
        shape.validate()?;
        let needed = shape.width().div_ceil(8);
        if bytes.len() < needed {
            return Err(PackedRecordsError::PackedTooShort {
                needed,
                found: bytes.len(),
            });
        }
        Ok(Self {
            shape,
            fields: [
                get_bits(bytes, 0, shape.nx),
                get_bits(bytes, shape.nx, shape.ny),
                get_bits(bytes, shape.nx + shape.ny, shape.nz),
            ],
        })
    }

    pub fn to_packed(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.shape.width().div_ceil(8)];
        let mut offset = 0;
        for ((_, width), value) in self.shape.fields().into_iter().zip(self.fields) {
            set_bits(&mut buf, offset, width, value);
            offset += width;
        }
        buf
    }

    pub fn get(&self, field: Field) -> u64 {
        self.fields[field as usize]
    }

    pub fn fields(&self) -> [u64; 3] {
        self.fields
    }

    /// Sets a field to the low bits of `value`.
    pub fn set(&mut self, field: Field, value: u64) {
        self.fields[field as usize] = value & low_mask(self.shape.field_width(field));
    }

    /// Sets a field, failing if `value` does not fit.
    pub fn try_set(&mut self, field: Field, value: u64) -> Result<()> {
        let width = self.shape.field_width(field);
        self.fields[field as usize] = fit(field, width, value, OverflowPolicy::Reject)?;
        Ok(())
    }
}

impl Shaped for DynRecord {
    fn shape(&self) -> Shape {
        self.shape
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> From<Record<NX, NY, NZ>> for DynRecord {
    fn from(r: Record<NX, NY, NZ>) -> Self {
        Self {
            shape: Record::<NX, NY, NZ>::SHAPE,
            fields: r.fields(),
        }
    }
}

/// Records of one runtime shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynRecordArray {
    shape: Shape,
    records: Vec<[u64; 3]>,
}

impl DynRecordArray {
    pub fn new(shape: Shape) -> Result<Self> {
        shape.validate()?;
        Ok(Self {
            shape,
            records: Vec::new(),
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn byte_size(&self) -> Result<usize> {
        self.shape.byte_size(self.records.len())
    }

    /// Appends a record. Fails with `ShapeMismatch` for a foreign shape.
    pub fn push(&mut self, record: DynRecord) -> Result<()> {
        self.shape.require(record.shape)?;
        self.records.push(record.fields);
        Ok(())
    }

    /// Appends a record built from raw values, truncated to the shape.
    pub fn push_fields(&mut self, x: u64, y: u64, z: u64) {
        let fields = [x, y, z];
        let masked = core::array::from_fn(|i| fields[i] & low_mask(self.shape.fields()[i].1));
        self.records.push(masked);
    }

    pub fn get(&self, index: usize) -> Option<DynRecord> {
        self.records.get(index).map(|&fields| DynRecord {
            shape: self.shape,
            fields,
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = DynRecord> + '_ {
        self.records.iter().map(|&fields| DynRecord {
            shape: self.shape,
            fields,
        })
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        codec::pack_fields(self.shape, self.records.iter().copied())
    }

    pub fn unpack(shape: Shape, bytes: &[u8], count: usize) -> Result<Self> {
        let records = codec::unpack_fields(shape, bytes, count, |fields| fields)?;
        Ok(Self { shape, records })
    }

    /// Converts to the const-generic array of the same shape.
    ///
    /// Fails with `ShapeMismatch` when `(NX, NY, NZ)` is not this shape.
    pub fn to_typed<const NX: usize, const NY: usize, const NZ: usize>(
        &self,
    ) -> Result<RecordArray<NX, NY, NZ>> {
        RecordArray::<NX, NY, NZ>::SHAPE.require(self.shape)?;
        Ok(self
            .records
            .iter()
            .map(|&[x, y, z]| Record::new(x, y, z))
            .collect())
    }
}

impl Shaped for DynRecordArray {
    fn shape(&self) -> Shape {
        self.shape
    }
}

impl PackedArray for DynRecordArray {
    fn count(&self) -> usize {
        self.records.len()
    }

    fn packed_bytes(&self) -> Result<Vec<u8>> {
        self.pack()
    }
}
