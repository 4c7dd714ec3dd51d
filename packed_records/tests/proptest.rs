//! Property-based tests for record packing.

use proptest::prelude::*;

use packed_records::{
    DynRecordArray, OverflowPolicy, PackedArray, PackedRecordsError, Record, RecordArray, Shape,
};

//
// -----------------------------------------------------------------------------
// Helper Functions
// -----------------------------------------------------------------------------

fn triples(max_len: usize) -> impl Strategy<Value = Vec<(u64, u64, u64)>> {
    prop::collection::vec((any::<u64>(), any::<u64>(), any::<u64>()), 0..max_len)
}

fn shapes() -> impl Strategy<Value = Shape> {
    (0usize..=64, 0usize..=64, 0usize..=64).prop_map(|(x, y, z)| Shape::new(x, y, z))
}

fn check_typed<const NX: usize, const NY: usize, const NZ: usize>(
    values: &[(u64, u64, u64)],
) -> Result<(), TestCaseError> {
    let records: Vec<Record<NX, NY, NZ>> = values
        .iter()
        .map(|&(x, y, z)| Record::new(x, y, z))
        .collect();
    let mut array = RecordArray::from_records(records.clone());
    let bytes = array.pack().unwrap().to_vec();

    prop_assert_eq!(bytes.len(), (values.len() * (NX + NY + NZ)).div_ceil(8));

    let restored = RecordArray::<NX, NY, NZ>::unpack(&bytes, values.len()).unwrap();
    prop_assert_eq!(restored.records(), &records[..]);
    Ok(())
}

//
// -----------------------------------------------------------------------------
// Round-trip
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_typed_roundtrip(values in triples(200)) {
        check_typed::<3, 2, 3>(&values)?;
        check_typed::<1, 1, 1>(&values)?;
        check_typed::<0, 7, 0>(&values)?;
        check_typed::<13, 5, 31>(&values)?;
        check_typed::<64, 1, 64>(&values)?;
        check_typed::<0, 0, 0>(&values)?;
    }
}

proptest! {
    #[test]
    fn prop_dynamic_roundtrip(shape in shapes(), values in triples(100)) {
        let mut array = DynRecordArray::new(shape).unwrap();
        for &(x, y, z) in &values {
            array.push_fields(x, y, z);
        }
        let bytes = array.pack().unwrap();
        prop_assert_eq!(bytes.len(), shape.byte_size(values.len()).unwrap());

        let restored = DynRecordArray::unpack(shape, &bytes, values.len()).unwrap();
        prop_assert_eq!(restored, array);
    }
}

//
// -----------------------------------------------------------------------------
// Layout
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_padding_is_zero(shape in shapes(), values in triples(50)) {
        let mut array = DynRecordArray::new(shape).unwrap();
        for &(x, y, z) in &values {
            array.push_fields(x, y, z);
        }
        let bytes = array.pack().unwrap();
        let used = (values.len() * shape.width()) % 8;
        if let (Some(&last), true) = (bytes.last(), used != 0) {
            prop_assert_eq!(last >> used, 0);
        }
    }
}

proptest! {
    #[test]
    fn prop_byte_size_formula(shape in shapes(), count in 0usize..100_000) {
        let bits = count * shape.width();
        let expected = bits / 8 + usize::from(bits % 8 != 0);
        prop_assert_eq!(shape.byte_size(count).unwrap(), expected);
    }
}

proptest! {
    #[test]
    fn prop_single_record_matches_array(x: u64, y: u64, z: u64) {
        let record = Record::<11, 9, 17>::new(x, y, z);
        let array = RecordArray::from_records(vec![record]);
        prop_assert_eq!(record.to_packed(), array.packed_bytes().unwrap());
        prop_assert_eq!(Record::<11, 9, 17>::from_packed(&record.to_packed()).unwrap(), record);
    }
}

proptest! {
    #[test]
    fn prop_prefix_decodes_prefix(values in triples(64), keep in 0usize..64) {
        let records: Vec<Record<5, 3, 7>> = values
            .iter()
            .map(|&(x, y, z)| Record::new(x, y, z))
            .collect();
        let keep = keep.min(records.len());
        let bytes = RecordArray::from_records(records.clone()).into_packed().unwrap();

        let restored = RecordArray::<5, 3, 7>::unpack(&bytes, keep).unwrap();
        prop_assert_eq!(restored.records(), &records[..keep]);
        prop_assert_eq!(restored.packed().unwrap().len(), RecordArray::<5, 3, 7>::byte_size_for(keep).unwrap());
    }
}

//
// -----------------------------------------------------------------------------
// Field overflow and range errors
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_truncation_keeps_low_bits(x: u64, y: u64, z: u64) {
        let r = Record::<6, 10, 20>::new(x, y, z);
        prop_assert_eq!(r.fields(), [x & 0x3F, y & 0x3FF, z & 0xF_FFFF]);
    }
}

proptest! {
    #[test]
    fn prop_reject_policy_fails_iff_truncation_changes_value(x: u64, y in 0u64..16, z in 0u64..16) {
        let checked = Record::<6, 4, 4>::with_policy(OverflowPolicy::Reject, x, y, z);
        if x < 64 {
            prop_assert_eq!(checked, Ok(Record::new(x, y, z)));
        } else {
            let is_overflow = matches!(checked, Err(PackedRecordsError::FieldOverflow { .. }));
            prop_assert!(is_overflow);
        }
    }
}

proptest! {
    #[test]
    fn prop_short_buffer_is_out_of_range(len in 0usize..32, extra in 1usize..10) {
        let bytes = vec![0xAAu8; len];
        // 3-bit records: the buffer holds exactly len * 8 / 3 of them
        let fits = len * 8 / 3;
        prop_assert!(RecordArray::<1, 1, 1>::unpack(&bytes, fits).is_ok());
        let is_out_of_range = matches!(
            RecordArray::<1, 1, 1>::unpack(&bytes, fits + extra),
            Err(PackedRecordsError::OutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
    }
}
