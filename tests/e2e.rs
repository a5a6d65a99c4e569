//! End-to-end scenarios exercising the writer/reader pair together
//! (§8 "Concrete end-to-end scenarios").

use std::io::Cursor;

use flatgeobuf::{
    Column, ColumnType, Error, Geometry, GeometryType, NodeItem, PropertyValue, Reader, Writer,
    WriterOptions,
};
use pretty_assertions::assert_eq;

fn point(x: f64, y: f64) -> Geometry {
    Geometry {
        type_: GeometryType::Point,
        xy: vec![x, y],
        z: None,
        m: None,
        ends: None,
        parts: Vec::new(),
    }
}

fn write_to_bytes(writer: Writer) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    writer.close(&mut out).unwrap();
    out.into_inner()
}

#[test]
fn single_point_roundtrip() {
    let columns = vec![Column::new("name", ColumnType::String)];
    let mut writer = Writer::create(GeometryType::Point, columns).unwrap();
    writer
        .create_feature(
            Some(&point(1.0, 2.0)),
            &[(0, PropertyValue::String("Alice".into()))],
        )
        .unwrap();
    let bytes = write_to_bytes(writer);

    assert_eq!(&bytes[0..8], &[0x66, 0x67, 0x62, 0x03, 0x66, 0x67, 0x62, 0x01]);

    let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
    let header = reader.header();
    assert_eq!(header.features_count, 1);
    assert_eq!(header.envelope, Some([1.0, 2.0, 1.0, 2.0]));
    assert_eq!(header.index_node_size, 16);
    assert_eq!(header.geometry_type, GeometryType::Point);
    assert_eq!(header.columns.len(), 1);
    assert_eq!(header.columns[0].name, "name");

    let feature = reader.get_feature(0).unwrap();
    assert_eq!(feature.geometry, Some(point(1.0, 2.0)));
    assert_eq!(
        feature.properties,
        vec![(0, PropertyValue::String("Alice".into()))]
    );

    let err = reader.get_feature(1).unwrap_err();
    assert!(matches!(err, Error::NotFound(1)));
}

#[test]
fn polygon_with_hole_keeps_a_single_interior_ring() {
    let exterior = [
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
    ];
    let hole = [(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0), (2.0, 2.0)];
    let mut xy = Vec::new();
    for &(x, y) in exterior.iter().chain(hole.iter()) {
        xy.push(x);
        xy.push(y);
    }
    let polygon = Geometry {
        type_: GeometryType::Polygon,
        xy,
        z: None,
        m: None,
        ends: Some(vec![5, 10]),
        parts: Vec::new(),
    };

    let mut writer = Writer::create(GeometryType::Polygon, Vec::new()).unwrap();
    writer.create_feature(Some(&polygon), &[]).unwrap();
    let bytes = write_to_bytes(writer);

    let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
    let feature = reader.get_next_feature().unwrap().unwrap();
    let geom = feature.geometry.unwrap();
    assert_eq!(geom.xy.len(), 20);
    assert_eq!(geom.ends, Some(vec![5, 10]));
}

#[test]
fn multipolygon_of_two_triangles_has_no_per_part_ends() {
    let triangle = |ox: f64, oy: f64| Geometry {
        type_: GeometryType::Polygon,
        xy: vec![ox, oy, ox + 1.0, oy, ox, oy + 1.0, ox, oy],
        z: None,
        m: None,
        ends: None,
        parts: Vec::new(),
    };
    let mp = Geometry {
        type_: GeometryType::MultiPolygon,
        xy: Vec::new(),
        z: None,
        m: None,
        ends: None,
        parts: vec![triangle(0.0, 0.0), triangle(10.0, 10.0)],
    };

    let mut writer = Writer::create(GeometryType::MultiPolygon, Vec::new()).unwrap();
    writer.create_feature(Some(&mp), &[]).unwrap();
    let bytes = write_to_bytes(writer);

    let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
    let feature = reader.get_next_feature().unwrap().unwrap();
    let geom = feature.geometry.unwrap();
    assert_eq!(geom.parts.len(), 2);
    for part in &geom.parts {
        assert_eq!(part.ends, None);
        assert_eq!(part.xy.len(), 8);
    }
}

#[test]
fn spatial_query_matches_brute_force_and_streaming_matches_in_memory() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xF6B7);

    let mut points = Vec::new();
    let mut writer = Writer::create(GeometryType::Point, Vec::new()).unwrap();
    for _ in 0..100 {
        let (x, y) = (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
        points.push((x, y));
        writer.create_feature(Some(&point(x, y)), &[]).unwrap();
    }
    let bytes = write_to_bytes(writer);

    let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
    let query = NodeItem::new(0.4, 0.4, 0.6, 0.6);
    reader.set_spatial_filter(Some(query));

    let mut found = Vec::new();
    while let Some(f) = reader.get_next_feature().unwrap() {
        let xy = f.geometry.unwrap().xy;
        found.push((xy[0], xy[1]));
    }
    found.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut expected: Vec<(f64, f64)> = points
        .into_iter()
        .filter(|&(x, y)| (0.4..=0.6).contains(&x) && (0.4..=0.6).contains(&y))
        .collect();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());

    assert_eq!(found, expected);
}

#[test]
fn heterogeneous_collection_round_trips_each_geometry_type() {
    let line = Geometry {
        type_: GeometryType::LineString,
        xy: vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.0],
        z: None,
        m: None,
        ends: None,
        parts: Vec::new(),
    };
    let multipoint = Geometry {
        type_: GeometryType::MultiPoint,
        xy: vec![0.0, 0.0, 5.0, 5.0],
        z: None,
        m: None,
        ends: None,
        parts: Vec::new(),
    };
    let geometries = vec![point(1.0, 1.0), line, multipoint];

    let mut writer =
        Writer::create_with_options(GeometryType::Unknown, Vec::new(), WriterOptions::default())
            .unwrap();
    for g in &geometries {
        writer.create_feature(Some(g), &[]).unwrap();
    }
    let bytes = write_to_bytes(writer);

    let reader = Reader::open(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.header().geometry_type, GeometryType::Unknown);

    let mut decoded: Vec<Geometry> = reader.map(|f| f.unwrap().geometry.unwrap()).collect();
    decoded.sort_by(|a, b| format!("{:?}", a.type_).cmp(&format!("{:?}", b.type_)));
    let mut expected = geometries;
    expected.sort_by(|a, b| format!("{:?}", a.type_).cmp(&format!("{:?}", b.type_)));
    assert_eq!(decoded, expected);
}

#[test]
fn write_without_index_disables_random_access() {
    let mut writer = Writer::create_with_options(
        GeometryType::Point,
        Vec::new(),
        WriterOptions {
            spatial_index: false,
            ..Default::default()
        },
    )
    .unwrap();
    for i in 0..10 {
        writer
            .create_feature(Some(&point(i as f64, i as f64)), &[])
            .unwrap();
    }
    let bytes = write_to_bytes(writer);

    let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.header().index_node_size, 0);
    assert!(matches!(reader.get_feature(0).unwrap_err(), Error::NoIndex));

    let mut count = 0;
    while let Some(f) = reader.get_next_feature().unwrap() {
        let xy = f.geometry.unwrap().xy;
        assert_eq!(xy, vec![count as f64, count as f64]);
        count += 1;
    }
    assert_eq!(count, 10);
}
