//! Black-box property round trips through the writer/reader pair,
//! covering every scalar [`ColumnType`] (§8 "Property roundtrip").

use std::io::Cursor;

use flatgeobuf::{Column, ColumnType, Error, Geometry, GeometryType, PropertyValue, Reader, Writer};

fn point() -> Geometry {
    Geometry {
        type_: GeometryType::Point,
        xy: vec![0.0, 0.0],
        z: None,
        m: None,
        ends: None,
        parts: Vec::new(),
    }
}

#[test]
fn every_scalar_column_type_round_trips() {
    let columns = vec![
        Column::new("a", ColumnType::Bool),
        Column::new("b", ColumnType::Byte),
        Column::new("c", ColumnType::UByte),
        Column::new("d", ColumnType::Short),
        Column::new("e", ColumnType::UShort),
        Column::new("f", ColumnType::Int),
        Column::new("g", ColumnType::UInt),
        Column::new("h", ColumnType::Long),
        Column::new("i", ColumnType::ULong),
        Column::new("j", ColumnType::Float),
        Column::new("k", ColumnType::Double),
        Column::new("l", ColumnType::String),
        Column::new("m", ColumnType::Json),
        Column::new("n", ColumnType::DateTime),
        Column::new("o", ColumnType::Binary),
    ];
    let values = vec![
        (0, PropertyValue::Bool(true)),
        (1, PropertyValue::Byte(-12)),
        (2, PropertyValue::UByte(200)),
        (3, PropertyValue::Short(-1234)),
        (4, PropertyValue::UShort(60000)),
        (5, PropertyValue::Int(-100000)),
        (6, PropertyValue::UInt(3_000_000_000)),
        (7, PropertyValue::Long(-5_000_000_000)),
        (8, PropertyValue::ULong(10_000_000_000)),
        (9, PropertyValue::Float(1.5)),
        (10, PropertyValue::Double(2.718281828)),
        (11, PropertyValue::String("hello".into())),
        (12, PropertyValue::Json("{\"a\":1}".into())),
        (13, PropertyValue::DateTime("2024-01-02T03:04:05Z".into())),
        (14, PropertyValue::Binary(vec![1, 2, 3, 4])),
    ];

    let mut writer = Writer::create(GeometryType::Point, columns).unwrap();
    writer.create_feature(Some(&point()), &values).unwrap();
    let mut out = Cursor::new(Vec::new());
    writer.close(&mut out).unwrap();

    let mut reader = Reader::open(Cursor::new(out.into_inner())).unwrap();
    let feature = reader.get_next_feature().unwrap().unwrap();
    assert_eq!(feature.properties, values);
}

#[test]
fn unset_columns_stay_absent() {
    let columns = vec![
        Column::new("name", ColumnType::String),
        Column::new("count", ColumnType::Int),
    ];
    let mut writer = Writer::create(GeometryType::Point, columns).unwrap();
    writer
        .create_feature(Some(&point()), &[(0, PropertyValue::String("only-one".into()))])
        .unwrap();
    let mut out = Cursor::new(Vec::new());
    writer.close(&mut out).unwrap();

    let mut reader = Reader::open(Cursor::new(out.into_inner())).unwrap();
    let feature = reader.get_next_feature().unwrap().unwrap();
    assert_eq!(
        feature.properties,
        vec![(0, PropertyValue::String("only-one".into()))]
    );
}

#[test]
fn value_type_mismatch_is_rejected_at_write_time() {
    let columns = vec![Column::new("count", ColumnType::Int)];
    let mut writer = Writer::create(GeometryType::Point, columns).unwrap();
    let err = writer
        .create_feature(Some(&point()), &[(0, PropertyValue::String("nope".into()))])
        .unwrap_err();
    assert!(matches!(err, Error::CorruptData(_)));
}

#[test]
fn oversized_datetime_is_rejected() {
    let columns = vec![Column::new("ts", ColumnType::DateTime)];
    let mut writer = Writer::create(GeometryType::Point, columns).unwrap();
    let too_long = "2024-01-02T03:04:05.123456789-00:00-extra-padding";
    let err = writer
        .create_feature(Some(&point()), &[(0, PropertyValue::DateTime(too_long.into()))])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSize(_)));
}
