use crate::shape::{Field, Shape};
#[cfg(feature = "std")]
use thiserror::Error;

#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedRecordsError {
    #[cfg_attr(
        feature = "std",
        error("Field {field} width must be in the range 0..=64, got {width}")
    )]
    InvalidBitWidth { field: Field, width: usize },

    #[cfg_attr(
        feature = "std",
        error("Value {value} does not fit in {width} bits of field {field}")
    )]
    FieldOverflow {
        field: Field,
        value: u64,
        width: usize,
    },

    #[cfg_attr(
        feature = "std",
        error("Buffer holds {available_bits} bits, {needed_bits} bits requested")
    )]
    OutOfRange {
        needed_bits: usize,
        available_bits: usize,
    },

    #[cfg_attr(
        feature = "std",
        error("Shape mismatch: expected {expected}, found {found}")
    )]
    ShapeMismatch { expected: Shape, found: Shape },

    #[cfg_attr(
        feature = "std",
        error("{count} records of {width} bits overflow the addressable size")
    )]
    SizeOverflow { count: usize, width: usize },

    #[cfg_attr(
        feature = "std",
        error("Packed record needs {needed} bytes, got {found}")
    )]
    PackedTooShort { needed: usize, found: usize },
}

pub type Result<T> = core::result::Result<T, PackedRecordsError>;

#[cfg(not(feature = "std"))]
impl core::fmt::Display for PackedRecordsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PackedRecordsError::InvalidBitWidth { field, width } => write!(
                f,
                "Field {} width must be in the range 0..=64, got {}",
                field, width
            ),
            PackedRecordsError::FieldOverflow {
                field,
                value,
                width,
            } => write!(
                f,
                "Value {} does not fit in {} bits of field {}",
                value, width, field
            ),
            PackedRecordsError::OutOfRange {
                needed_bits,
                available_bits,
            } => write!(
                f,
                "Buffer holds {} bits, {} bits requested",
                available_bits, needed_bits
            ),
            PackedRecordsError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {}, found {}", expected, found)
            }
            PackedRecordsError::SizeOverflow { count, width } => write!(
                f,
                "{} records of {} bits overflow the addressable size",
                count, width
            ),
            PackedRecordsError::PackedTooShort { needed, found } => {
                write!(f, "Packed record needs {} bytes, got {}", needed, found)
            }
        }
    }
}

#[cfg(not(feature = "std"))]
impl core::error::Error for PackedRecordsError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = PackedRecordsError::ShapeMismatch {
            expected: Shape::new(3, 2, 3),
            found: Shape::new(1, 1, 1),
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected (3, 2, 3), found (1, 1, 1)"
        );

        let err = PackedRecordsError::FieldOverflow {
            field: Field::Y,
            value: 9,
            width: 2,
        };
        assert_eq!(err.to_string(), "Value 9 does not fit in 2 bits of field y");
    }
}
