//! Fixed-shape records of three bitfields.
//!
//! # Examples
//!
//! ```rust
//! use packed_records::Record;
//!
//! // 3 + 2 + 3 bits: one record fills exactly one byte
//! let r = Record::<3, 2, 3>::new(0b101, 0b11, 0b010);
//! assert_eq!(r.to_packed(), vec![0b010_11_101]);
//!
//! let back = Record::<3, 2, 3>::from_packed(&r.to_packed()).unwrap();
//! assert_eq!(back, r);
//! ```

use crate::bit_ops::{get_bits, low_mask, set_bits};
use crate::error::{PackedRecordsError, Result};
use crate::shape::{Field, Shape, Shaped};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// What to do with a value wider than its field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Keep the low bits.
    #[default]
    Truncate,
    /// Fail with `FieldOverflow`.
    Reject,
}

/// Fits `value` into `width` bits according to `policy`.
pub(crate) fn fit(field: Field, width: usize, value: u64, policy: OverflowPolicy) -> Result<u64> {
    let masked = value & low_mask(width);
    match policy {
        OverflowPolicy::Truncate => Ok(masked),
        OverflowPolicy::Reject if masked == value => Ok(value),
        OverflowPolicy::Reject => Err(PackedRecordsError::FieldOverflow {
            field,
            value,
            width,
        }),
    }
}

/// A record with fields `x`, `y`, `z` of `NX`, `NY`, `NZ` bits.
///
/// Each field is at most 64 bits wide; wider shapes fail to compile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record<const NX: usize, const NY: usize, const NZ: usize> {
    x: u64,
    y: u64,
    z: u64,
}

/// Record whose three fields share one width.
pub type UniformRecord<const N: usize> = Record<N, N, N>;

impl<const NX: usize, const NY: usize, const NZ: usize> Record<NX, NY, NZ> {
    pub const SHAPE: Shape = Shape::new(NX, NY, NZ);

    /// Total width in bits.
    pub const WIDTH: usize = NX + NY + NZ;

    /// Bytes taken by one record on its own.
    pub const PACKED_LEN: usize = Self::WIDTH.div_ceil(8);

    const VALID: () = assert!(
        Self::SHAPE.is_valid(),
        "record fields must be at most 64 bits wide"
    );

    /// Builds a record, keeping only the low bits of each value.
    ///
    /// ```
    /// use packed_records::Record;
    ///
    /// let r = Record::<2, 2, 2>::new(0b111, 0b1, 0b1010);
    /// assert_eq!(r.fields(), [0b11, 0b01, 0b10]);
    /// ```
    pub const fn new(x: u64, y: u64, z: u64) -> Self {
        let () = Self::VALID;
        Self {
            x: x & low_mask(NX),
            y: y & low_mask(NY),
            z: z & low_mask(NZ),
        }
    }

    /// Builds a record, failing if any value does not fit its field.
    pub fn try_new(x: u64, y: u64, z: u64) -> Result<Self> {
        Self::with_policy(OverflowPolicy::Reject, x, y, z)
    }

    pub fn with_policy(policy: OverflowPolicy, x: u64, y: u64, z: u64) -> Result<Self> {
        let () = Self::VALID;
        Ok(Self {
            x: fit(Field::X, NX, x, policy)?,
            y: fit(Field::Y, NY, y, policy)?,
            z: fit(Field::Z, NZ, z, policy)?,
        })
    }

    /// Splits the first `WIDTH` bits of `bytes` into x, y and z.
    ///
    /// Bits past `WIDTH` are ignored.
    pub fn from_packed(bytes: &[u8]) -> Result<Self> {
        let () = Self::VALID;
        if bytes.len() < Self::PACKED_LEN {
            return Err(PackedRecordsError::PackedTooShort {
                needed: Self::PACKED_LEN,
                found: bytes.len(),
            });
        }
        Ok(Self {
            x: get_bits(bytes, 0, NX),
            y: get_bits(bytes, NX, NY),
            z: get_bits(bytes, NX + NY, NZ),
        })
    }

    /// Concatenates x, y and z into `PACKED_LEN` bytes, high bits zeroed.
    pub fn to_packed(&self) -> Vec<u8> {
        let () = Self::VALID;
        let mut buf = vec![0u8; Self::PACKED_LEN];
        set_bits(&mut buf, 0, NX, self.x);
        set_bits(&mut buf, NX, NY, self.y);
        set_bits(&mut buf, NX + NY, NZ, self.z);
        buf
    }

    /// Packs the record with the z segment copied from x.
    ///
    /// Older encoders filled z from the low bits of x; bits past `NX` read
    /// as zero. The result does not round-trip through `from_packed`.
    #[cfg(feature = "legacy-alias")]
    pub fn to_packed_legacy(&self) -> Vec<u8> {
        let () = Self::VALID;
        log::warn!("encoding record of shape {} with aliased z segment", Self::SHAPE);
        let mut buf = vec![0u8; Self::PACKED_LEN];
        set_bits(&mut buf, 0, NX, self.x);
        set_bits(&mut buf, NX, NY, self.y);
        set_bits(&mut buf, NX + NY, NZ, self.x);
        buf
    }

    pub fn x(&self) -> u64 {
        self.x
    }

    pub fn y(&self) -> u64 {
        self.y
    }

    pub fn z(&self) -> u64 {
        self.z
    }

    pub fn get(&self, field: Field) -> u64 {
        match field {
            Field::X => self.x,
            Field::Y => self.y,
            Field::Z => self.z,
        }
    }

    /// Field values in packing order.
    pub fn fields(&self) -> [u64; 3] {
        [self.x, self.y, self.z]
    }

    /// Sets a field to the low bits of `value`.
    pub fn set(&mut self, field: Field, value: u64) {
        let masked = value & low_mask(Self::SHAPE.field_width(field));
        *self.slot(field) = masked;
    }

    /// Sets a field, failing if `value` does not fit. The record is left
    /// unchanged on error.
    pub fn try_set(&mut self, field: Field, value: u64) -> Result<()> {
        let value = fit(
            field,
            Self::SHAPE.field_width(field),
            value,
            OverflowPolicy::Reject,
        )?;
        *self.slot(field) = value;
        Ok(())
    }

    pub fn set_x(&mut self, value: u64) {
        self.set(Field::X, value);
    }

    pub fn set_y(&mut self, value: u64) {
        self.set(Field::Y, value);
    }

    pub fn set_z(&mut self, value: u64) {
        self.set(Field::Z, value);
    }

    fn slot(&mut self, field: Field) -> &mut u64 {
        match field {
            Field::X => &mut self.x,
            Field::Y => &mut self.y,
            Field::Z => &mut self.z,
        }
    }
}

/// All fields zero.
impl<const NX: usize, const NY: usize, const NZ: usize> Default for Record<NX, NY, NZ> {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> Shaped for Record<NX, NY, NZ> {
    fn shape(&self) -> Shape {
        Self::SHAPE
    }
}

impl<const NX: usize, const NY: usize, const NZ: usize> From<Record<NX, NY, NZ>> for [u64; 3] {
    fn from(r: Record<NX, NY, NZ>) -> Self {
        r.fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_truncates_to_declared_widths() {
        let r = Record::<3, 2, 3>::new(0b1111_0101, 0b111, 0xFF);
        assert_eq!(r.x(), 0b101);
        assert_eq!(r.y(), 0b11);
        assert_eq!(r.z(), 0b111);
    }

    #[test]
    fn try_new_rejects_overflow() {
        assert!(Record::<3, 2, 3>::try_new(7, 3, 7).is_ok());
        assert_eq!(
            Record::<3, 2, 3>::try_new(7, 4, 7),
            Err(PackedRecordsError::FieldOverflow {
                field: Field::Y,
                value: 4,
                width: 2
            })
        );
    }

    #[test]
    fn with_policy_truncate_matches_new() {
        let a = Record::<4, 4, 4>::with_policy(OverflowPolicy::Truncate, 0x1F, 0x2F, 0x3F).unwrap();
        assert_eq!(a, Record::<4, 4, 4>::new(0x1F, 0x2F, 0x3F));
    }

    #[test]
    fn packed_roundtrip_keeps_z() {
        // x and z differ so an aliased encoder would be caught.
        let r = Record::<4, 3, 5>::new(0b1001, 0b010, 0b10110);
        let packed = r.to_packed();
        assert_eq!(packed.len(), 2);
        assert_eq!(Record::<4, 3, 5>::from_packed(&packed).unwrap(), r);
    }

    #[test]
    fn from_packed_ignores_trailing_bits() {
        // W = 3: only the low three bits of the byte matter.
        let r = UniformRecord::<1>::from_packed(&[0b1111_1010]).unwrap();
        assert_eq!(r.fields(), [0, 1, 0]);
    }

    #[test]
    fn from_packed_needs_enough_bytes() {
        assert_eq!(
            Record::<8, 8, 1>::from_packed(&[0, 0]),
            Err(PackedRecordsError::PackedTooShort { needed: 3, found: 2 })
        );
    }

    #[test]
    fn setters_truncate_and_try_set_checks() {
        let mut r = Record::<3, 2, 3>::default();
        r.set_x(0b1110);
        assert_eq!(r.x(), 0b110);
        r.set(Field::Z, 5);
        assert_eq!(r.z(), 5);
        assert!(r.try_set(Field::Y, 4).is_err());
        assert_eq!(r.y(), 0);
        r.try_set(Field::Y, 3).unwrap();
        assert_eq!(r.get(Field::Y), 3);
    }

    #[test]
    fn default_is_all_zero_at_full_width() {
        let r = Record::<64, 64, 64>::default();
        assert_eq!(r, Record::new(0, 0, 0));
        assert_eq!(r.to_packed(), vec![0u8; 24]);
        assert_eq!(UniformRecord::<0>::default().to_packed(), Vec::<u8>::new());
    }

    #[test]
    fn shape_queries() {
        let r = Record::<3, 2, 5>::default();
        assert_eq!(r.size(), 10);
        assert_eq!(r.size_x(), 3);
        assert_eq!(r.size_y(), 2);
        assert_eq!(r.size_z(), 5);
        assert_eq!(r.shape(), Shape::new(3, 2, 5));
    }

    #[test]
    fn full_width_and_empty_fields() {
        let r = Record::<64, 0, 64>::new(u64::MAX, 123, 1);
        assert_eq!(r.fields(), [u64::MAX, 0, 1]);
        assert_eq!(Record::<64, 0, 64>::from_packed(&r.to_packed()).unwrap(), r);

        let empty = Record::<0, 0, 0>::new(1, 2, 3);
        assert!(empty.to_packed().is_empty());
        assert_eq!(Record::<0, 0, 0>::from_packed(&[]).unwrap(), empty);
    }

    #[cfg(feature = "legacy-alias")]
    #[test]
    fn legacy_encoder_copies_x_into_z() {
        let r = Record::<3, 2, 3>::new(0b101, 0b11, 0b010);
        assert_eq!(r.to_packed_legacy(), vec![0b101_11_101]);

        // z wider than x: the extra bits come out zero
        let r = Record::<2, 0, 4>::new(0b11, 0, 0b1111);
        assert_eq!(r.to_packed_legacy(), vec![0b0011_11]);
    }
}
