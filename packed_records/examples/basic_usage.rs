use packed_records::{DynRecordArray, PackedRecordsError, Record, RecordArray, Shape};

fn main() -> Result<(), PackedRecordsError> {
    println!("=== Packed Records Examples ===\n");

    // Example 1: Byte-aligned records
    example_byte_aligned()?;

    // Example 2: Odd widths with padding
    example_odd_width()?;

    // Example 3: Shape chosen at runtime
    example_runtime_shape()?;

    Ok(())
}

fn example_byte_aligned() -> Result<(), PackedRecordsError> {
    println!("Example 1: 3 + 2 + 3 bit records");

    let mut array = RecordArray::<3, 2, 3>::new();
    array.push(Record::new(0b101, 0b11, 0b010));
    array.push(Record::new(0b001, 0b00, 0b111));

    let bytes = array.pack()?.to_vec();
    println!("  {} records -> {:02X?}", array.count(), bytes);

    let restored = RecordArray::<3, 2, 3>::unpack(&bytes, array.count())?;
    for r in &restored {
        println!("  x={:03b} y={:02b} z={:03b}", r.x(), r.y(), r.z());
    }
    println!();

    Ok(())
}

fn example_odd_width() -> Result<(), PackedRecordsError> {
    println!("Example 2: 1 + 1 + 1 bit records");

    let mut array: RecordArray<1, 1, 1> = (0..5).map(|i| Record::new(i, i >> 1, i >> 2)).collect();
    let bytes = array.pack()?.to_vec();
    println!(
        "  {} records x 3 bits = {} bytes: {:08b} {:08b}",
        array.count(),
        bytes.len(),
        bytes[0],
        bytes[1]
    );

    match RecordArray::<1, 1, 1>::unpack(&bytes, 6) {
        Ok(_) => println!("  unexpected: 6 records decoded"),
        Err(e) => println!("  asking for 6 records fails: {}", e),
    }
    println!();

    Ok(())
}

fn example_runtime_shape() -> Result<(), PackedRecordsError> {
    println!("Example 3: Runtime shape");

    let shape = Shape::new(12, 12, 8);
    let mut array = DynRecordArray::new(shape)?;
    array.push_fields(0xABC, 0x123, 0xFF);
    array.push_fields(0x456, 0x789, 0x01);

    let bytes = array.pack()?;
    println!("  shape {} packs {} records into {} bytes", shape, array.count(), bytes.len());

    let typed = DynRecordArray::unpack(shape, &bytes, 2)?.to_typed::<12, 12, 8>()?;
    println!("  first record: {:?}", typed.records()[0].fields());
    println!();

    Ok(())
}
