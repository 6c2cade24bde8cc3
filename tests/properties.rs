use std::sync::Arc;

use bitform::{
    buffer::BitBuffer,
    errors::FieldError,
    order::ByteOrder,
    record::Record,
    schema::Schema,
};
use proptest::prelude::*;

fn max_value(width: usize) -> u64 {
    if width == 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn two_fields(name: &str, first: (&str, usize), second: (&str, usize)) -> Arc<Schema> {
    Arc::new(
        Schema::builder(name)
            .field(first.0, first.1)
            .field(second.0, second.1)
            .build()
            .unwrap(),
    )
}

fn schema_of(widths: &[usize]) -> Arc<Schema> {
    let mut builder = Schema::builder("Prop");
    for (i, &width) in widths.iter().enumerate() {
        builder = builder.field(format!("f{i}"), width);
    }
    Arc::new(builder.build().unwrap())
}

/// Field widths together with one valid value per field.
fn layout() -> impl Strategy<Value = (Vec<usize>, Vec<u64>)> {
    prop::collection::vec(1usize..=64, 1..12).prop_flat_map(|widths| {
        let values: Vec<_> = widths.iter().map(|&w| 0..=max_value(w)).collect();
        (Just(widths), values)
    })
}

fn order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Big), Just(ByteOrder::Little)]
}

fn named(values: &[u64]) -> Vec<(String, u64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (format!("f{i}"), v))
        .collect()
}

proptest! {
    #[test]
    fn values_survive_buffer_round_trip((widths, values) in layout()) {
        let schema = schema_of(&widths);
        let record = Record::from_values(&schema, named(&values)).unwrap();
        let decoded = Record::from_buffer(&schema, record.bits().clone()).unwrap();

        for (i, &value) in values.iter().enumerate() {
            prop_assert_eq!(decoded.get(&format!("f{i}")).unwrap(), value);
        }
    }

    #[test]
    fn bytes_round_trip((widths, values) in layout(), order in order()) {
        let schema = schema_of(&widths);
        let record = Record::from_values(&schema, named(&values)).unwrap();
        let bytes = record.to_bytes(order);

        prop_assert_eq!(bytes.len(), schema.total_bits().div_ceil(8));
        let bits = BitBuffer::from_bytes(&bytes, order, schema.total_bits()).unwrap();
        prop_assert_eq!(&bits, record.bits());
    }

    #[test]
    fn slices_match_field_values((widths, values) in layout()) {
        let schema = schema_of(&widths);
        let record = Record::from_values(&schema, named(&values)).unwrap();
        let bits = record.bits();

        prop_assert_eq!(&bits.slice(0, bits.len()).unwrap(), bits);
        for (field, &value) in schema.fields().iter().zip(&values) {
            let slice = bits.slice(field.offset_bits, field.end_bits()).unwrap();
            prop_assert_eq!(slice.to_u64(), Some(value));
        }
    }

    #[test]
    fn fields_tile_the_record(widths in prop::collection::vec(1usize..=64, 0..16)) {
        let schema = schema_of(&widths);
        let mut next = 0;
        for field in schema.fields() {
            prop_assert_eq!(field.offset_bits, next);
            next = field.end_bits();
        }
        prop_assert_eq!(next, schema.total_bits());
        prop_assert_eq!(schema.total_bits(), widths.iter().sum::<usize>());
    }

    #[test]
    fn width_is_enforced((widths, values) in layout(), pick in any::<prop::sample::Index>()) {
        let schema = schema_of(&widths);
        let mut record = Record::from_values(&schema, named(&values)).unwrap();
        let i = pick.index(widths.len());
        let name = format!("f{i}");
        let width = widths[i];

        prop_assert!(record.set(&name, max_value(width)).is_ok());
        prop_assert_eq!(record.get(&name).unwrap(), max_value(width));

        if width < 64 {
            let err = record.set(&name, 1u64 << width).unwrap_err();
            let is_too_wide = matches!(err, FieldError::ValueTooWide { .. });
            prop_assert!(is_too_wide);
        }
    }

    #[test]
    fn set_leaves_other_fields_alone(
        (widths, values) in layout(),
        pick in any::<prop::sample::Index>(),
        fresh in any::<u64>(),
    ) {
        let schema = schema_of(&widths);
        let mut record = Record::from_values(&schema, named(&values)).unwrap();
        let i = pick.index(widths.len());
        let value = fresh & max_value(widths[i]);

        record.set(&format!("f{i}"), value).unwrap();

        let bytes = record.to_bytes(ByteOrder::Big);
        let decoded = Record::from_bytes(&schema, &bytes, ByteOrder::Big).unwrap();
        for (j, &original) in values.iter().enumerate() {
            let expected = if j == i { value } else { original };
            prop_assert_eq!(decoded.get(&format!("f{j}")).unwrap(), expected);
        }
    }
}

#[test]
fn declaration_order_changes_the_wire() {
    let narrow_first = two_fields("A", ("x", 3), ("y", 5));
    let wide_first = two_fields("B", ("y", 5), ("x", 3));

    let values = [("x", 0b101), ("y", 0b00011)];
    let a = Record::from_values(&narrow_first, values).unwrap();
    let b = Record::from_values(&wide_first, values).unwrap();

    assert_eq!(narrow_first.field("x").unwrap().offset_bits, 0);
    assert_eq!(wide_first.field("x").unwrap().offset_bits, 5);
    assert_eq!(a.to_bytes(ByteOrder::Big), vec![0b101_00011]);
    assert_eq!(b.to_bytes(ByteOrder::Big), vec![0b00011_101]);
}

#[test]
fn decodes_documented_layouts() {
    let header = Arc::new(
        Schema::builder("Header")
            .field("flag", 1)
            .field("mode", 2)
            .field("counter", 5)
            .build()
            .unwrap(),
    );
    let record = Record::from_bytes(&header, &[0xC9], ByteOrder::Big).unwrap();
    assert_eq!(
        record.iter().collect::<Vec<_>>(),
        vec![("flag", 1), ("mode", 2), ("counter", 9)]
    );

    let word = two_fields("Word", ("a", 4), ("b", 12));
    let record = Record::from_values(&word, [("a", 0xF), ("b", 0)]).unwrap();
    assert_eq!(record.to_bytes(ByteOrder::Big), vec![0xF0, 0x00]);
    assert_eq!(record.to_bytes(ByteOrder::Little), vec![0x00, 0xF0]);
}
