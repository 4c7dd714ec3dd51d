//! Record shapes and the size arithmetic derived from them.

use core::fmt;

use crate::error::{PackedRecordsError, Result};

/// Widest field a record can hold.
pub const MAX_FIELD_BITS: usize = 64;

/// One of the three bitfields of a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    X,
    Y,
    Z,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::X => f.write_str("x"),
            Field::Y => f.write_str("y"),
            Field::Z => f.write_str("z"),
        }
    }
}

/// Bit widths `(nx, ny, nz)` of a record's three fields.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl Shape {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Shape with the same width for all three fields.
    pub const fn uniform(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Total record width in bits, saturating for invalid shapes.
    pub const fn width(&self) -> usize {
        self.nx.saturating_add(self.ny).saturating_add(self.nz)
    }

    pub const fn field_width(&self, field: Field) -> usize {
        match field {
            Field::X => self.nx,
            Field::Y => self.ny,
            Field::Z => self.nz,
        }
    }

    /// Fields paired with their widths, in packing order.
    pub const fn fields(&self) -> [(Field, usize); 3] {
        [(Field::X, self.nx), (Field::Y, self.ny), (Field::Z, self.nz)]
    }

    pub const fn is_valid(&self) -> bool {
        self.nx <= MAX_FIELD_BITS && self.ny <= MAX_FIELD_BITS && self.nz <= MAX_FIELD_BITS
    }

    /// Checks every field fits in a `u64`.
    pub fn validate(&self) -> Result<()> {
        for (field, width) in self.fields() {
            if width > MAX_FIELD_BITS {
                return Err(PackedRecordsError::InvalidBitWidth { field, width });
            }
        }
        Ok(())
    }

    /// Number of bits `count` records occupy.
    pub fn bit_size(&self, count: usize) -> Result<usize> {
        self.validate()?;
        count
            .checked_mul(self.width())
            .ok_or(PackedRecordsError::SizeOverflow {
                count,
                width: self.width(),
            })
    }

    /// Bytes needed to pack `count` records: `ceil(count * width / 8)`.
    ///
    /// ```
    /// use packed_records::Shape;
    ///
    /// let shape = Shape::new(1, 1, 1);
    /// assert_eq!(shape.byte_size(5).unwrap(), 2);
    /// assert_eq!(shape.byte_size(8).unwrap(), 3);
    /// ```
    pub fn byte_size(&self, count: usize) -> Result<usize> {
        Ok(self.bit_size(count)?.div_ceil(8))
    }

    /// Fails with `ShapeMismatch` unless `other` equals `self`.
    pub fn require(&self, other: Shape) -> Result<()> {
        if *self == other {
            Ok(())
        } else {
            Err(PackedRecordsError::ShapeMismatch {
                expected: *self,
                found: other,
            })
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.nx, self.ny, self.nz)
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((nx, ny, nz): (usize, usize, usize)) -> Self {
        Self::new(nx, ny, nz)
    }
}

/// Anything whose layout is described by a [`Shape`].
pub trait Shaped {
    fn shape(&self) -> Shape;

    fn size(&self) -> usize {
        self.shape().width()
    }

    fn size_x(&self) -> usize {
        self.shape().nx
    }

    fn size_y(&self) -> usize {
        self.shape().ny
    }

    fn size_z(&self) -> usize {
        self.shape().nz
    }
}

impl Shaped for Shape {
    fn shape(&self) -> Shape {
        *self
    }
}
