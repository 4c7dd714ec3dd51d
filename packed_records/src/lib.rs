//! # packed_records
//!
//! Dense bit-packing of records made of three fixed-width fields.
//!
//! ```rust
//! use packed_records::{Record, RecordArray};
//!
//! // 1 + 1 + 1 bits per record
//! let mut array = RecordArray::<1, 1, 1>::new();
//! for i in 0..5 {
//!     array.push(Record::new(i, i >> 1, i >> 2));
//! }
//!
//! // 15 bits round up to 2 bytes, the last bit is zero padding
//! let bytes = array.pack().unwrap().to_vec();
//! assert_eq!(bytes.len(), 2);
//!
//! let restored = RecordArray::<1, 1, 1>::unpack(&bytes, 5).unwrap();
//! assert_eq!(restored, array);
//! ```
//!
//! ## Layout
//!
//! Records are written back to back as a single bitstream: x bits, then y
//! bits, then z bits, each field low bit first. The first bit written into a
//! byte is its least significant bit. A buffer of `count` records is exactly
//! `ceil(count * (NX + NY + NZ) / 8)` bytes long and its unused high bits are
//! zero. The record count is not stored and must be supplied when unpacking.
//!
//! ## Field overflow
//!
//! Values wider than their field keep their low bits (`Record::new`,
//! `Record::set`). The checked variants (`Record::try_new`,
//! `Record::try_set`, [`OverflowPolicy::Reject`]) fail with
//! [`PackedRecordsError::FieldOverflow`] instead.
//!

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod error;
pub use error::{PackedRecordsError, Result};

mod bit_ops;

pub mod array;
pub mod codec;
pub mod dynamic;
pub mod record;
pub mod shape;

pub use array::{PackedArray, RecordArray, UniformRecordArray};
pub use dynamic::{DynRecord, DynRecordArray};
pub use record::{OverflowPolicy, Record, UniformRecord};
pub use shape::{Field, MAX_FIELD_BITS, Shape, Shaped};
