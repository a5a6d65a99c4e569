//! Black-box geometry round trips through the writer/reader pair,
//! covering dimensionality and nesting cases beyond the single-type
//! scenarios in `e2e.rs` (§8 "Geometry roundtrip").

use std::io::Cursor;

use flatgeobuf::{Geometry, GeometryType, Reader, Writer, WriterOptions};

fn roundtrip(geometry_type: GeometryType, has_z: bool, has_m: bool, g: &Geometry) -> Geometry {
    let mut writer = Writer::create_with_options(
        geometry_type,
        Vec::new(),
        WriterOptions {
            has_z,
            has_m,
            ..Default::default()
        },
    )
    .unwrap();
    writer.create_feature(Some(g), &[]).unwrap();
    let mut out = Cursor::new(Vec::new());
    writer.close(&mut out).unwrap();

    let mut reader = Reader::open(Cursor::new(out.into_inner())).unwrap();
    reader.get_next_feature().unwrap().unwrap().geometry.unwrap()
}

#[test]
fn point_with_z_and_m_round_trips() {
    let g = Geometry {
        type_: GeometryType::Point,
        xy: vec![1.0, 2.0],
        z: Some(vec![3.0]),
        m: Some(vec![4.0]),
        ends: None,
        parts: Vec::new(),
    };
    let decoded = roundtrip(GeometryType::Point, true, true, &g);
    assert_eq!(decoded, g);
}

#[test]
fn multilinestring_keeps_explicit_ends_even_for_two_parts() {
    let g = Geometry {
        type_: GeometryType::MultiLineString,
        xy: vec![0.0, 0.0, 1.0, 1.0, 5.0, 5.0, 6.0, 6.0, 7.0, 7.0],
        z: None,
        m: None,
        ends: Some(vec![2, 5]),
        parts: Vec::new(),
    };
    let decoded = roundtrip(GeometryType::MultiLineString, false, false, &g);
    assert_eq!(decoded.ends, Some(vec![2, 5]));
    assert_eq!(decoded.xy, g.xy);
}

#[test]
fn geometry_collection_preserves_nested_part_types() {
    let g = Geometry {
        type_: GeometryType::GeometryCollection,
        xy: Vec::new(),
        z: None,
        m: None,
        ends: None,
        parts: vec![
            Geometry {
                type_: GeometryType::Point,
                xy: vec![1.0, 1.0],
                z: None,
                m: None,
                ends: None,
                parts: Vec::new(),
            },
            Geometry {
                type_: GeometryType::LineString,
                xy: vec![0.0, 0.0, 1.0, 1.0],
                z: None,
                m: None,
                ends: None,
                parts: Vec::new(),
            },
        ],
    };
    let decoded = roundtrip(GeometryType::GeometryCollection, false, false, &g);
    assert_eq!(decoded.parts.len(), 2);
    assert_eq!(decoded.parts[0].type_, GeometryType::Point);
    assert_eq!(decoded.parts[1].type_, GeometryType::LineString);
}

#[test]
fn tin_of_one_triangle_omits_ends_on_the_wire() {
    let g = Geometry {
        type_: GeometryType::Tin,
        xy: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        z: None,
        m: None,
        ends: Some(vec![4]),
        parts: Vec::new(),
    };
    let decoded = roundtrip(GeometryType::Tin, false, false, &g);
    assert_eq!(decoded.ends, None);
    assert_eq!(decoded.xy, g.xy);
}
