use flatbuffers::{FlatBufferBuilder, WIPOffset};

use crate::consts::FEATURE_MAX_BUFFER_SIZE;
use crate::error::DecodeError;
use crate::fb::geometry_generated::{self, GeometryArgs};

use super::{Geometry, GeometryType};

fn read_f64_vec(v: Option<flatbuffers::Vector<'_, f64>>) -> Vec<f64> {
    match v {
        Some(v) => (0..v.len()).map(|i| v.get(i)).collect(),
        None => Vec::new(),
    }
}

fn read_u32_vec(v: Option<flatbuffers::Vector<'_, u32>>) -> Vec<u32> {
    match v {
        Some(v) => (0..v.len()).map(|i| v.get(i)).collect(),
        None => Vec::new(),
    }
}

/// Checks `actual == expected`, returning the §4.1 dimensionality error
/// named after `name` when a required parallel array is missing or the
/// wrong length.
fn check_len(name: &'static str, expected: usize, actual: usize) -> Result<(), DecodeError> {
    if actual != expected {
        return Err(DecodeError::WrongDimensionalityArray {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Splits a cumulative `ends` array into `[start, end)` ranges, rejecting
/// non-monotonic or out-of-range entries (§4.1, §4.2 decoder invariants).
fn segment_ranges(ends: &[u32], total_points: usize) -> Result<Vec<(usize, usize)>, DecodeError> {
    let mut start = 0usize;
    let mut ranges = Vec::with_capacity(ends.len());
    for &e in ends {
        let end = e as usize;
        if end < start || end > total_points {
            return Err(DecodeError::OffsetOutOfRange {
                offset: start,
                length: end.saturating_sub(start),
                size: total_points,
            });
        }
        ranges.push((start, end));
        start = end;
    }
    Ok(ranges)
}

/// Decodes one on-disk geometry node into the in-memory tree (§4.1).
///
/// `geometry_type` is the header's declared layer type; `GeometryType::Unknown`
/// means the node's own tag is authoritative.
pub fn decode(
    node: geometry_generated::Geometry<'_>,
    geometry_type: GeometryType,
    has_z: bool,
    has_m: bool,
) -> Result<Geometry, DecodeError> {
    let effective = if matches!(geometry_type, GeometryType::Unknown) {
        GeometryType::from_fb(node.type_())?
    } else {
        geometry_type
    };
    decode_node(node, effective, has_z, has_m)
}

fn decode_node(
    node: geometry_generated::Geometry<'_>,
    effective: GeometryType,
    has_z: bool,
    has_m: bool,
) -> Result<Geometry, DecodeError> {
    if effective.is_nested() {
        let raw_parts = node.parts();
        let mut parts = Vec::new();
        if let Some(raw_parts) = raw_parts {
            parts.reserve(raw_parts.len());
            for i in 0..raw_parts.len() {
                let part_node = raw_parts.get(i);
                let part_type = match effective {
                    GeometryType::MultiPolygon => GeometryType::Polygon,
                    _ => GeometryType::from_fb(part_node.type_())?,
                };
                parts.push(decode_node(part_node, part_type, has_z, has_m)?);
            }
        }
        return Ok(Geometry {
            type_: effective,
            xy: Vec::new(),
            z: None,
            m: None,
            ends: None,
            parts,
        });
    }

    let xy = read_f64_vec(node.xy());
    let num_points = xy.len() / 2;

    let z = if has_z {
        let v = read_f64_vec(node.z());
        check_len("z", num_points, v.len())?;
        Some(v)
    } else {
        None
    };
    let m = if has_m {
        let v = read_f64_vec(node.m());
        check_len("m", num_points, v.len())?;
        Some(v)
    } else {
        None
    };

    let raw_ends = node.ends().map(|v| read_u32_vec(Some(v)));
    let ends = match effective {
        GeometryType::Polygon | GeometryType::Triangle | GeometryType::Tin => {
            match &raw_ends {
                Some(e) if e.len() >= 2 => {
                    segment_ranges(e, num_points)?;
                    Some(e.clone())
                }
                // absent, or fewer than 2 entries: whole xy is one ring.
                _ => None,
            }
        }
        GeometryType::MultiLineString => {
            let e = raw_ends.unwrap_or_default();
            segment_ranges(&e, num_points)?;
            Some(e)
        }
        _ => None,
    };

    Ok(Geometry {
        type_: effective,
        xy,
        z,
        m,
        ends,
        parts: Vec::new(),
    })
}

fn total_point_count(g: &Geometry) -> usize {
    g.num_points() + g.parts.iter().map(total_point_count).sum::<usize>()
}

/// If `ends` is a single entry spanning the whole array it is redundant
/// (a ring with no holes, or a TIN of one triangle) and §4.1 requires the
/// encoder omit it entirely.
fn normalize_ends(ends: &Option<Vec<u32>>, total_points: usize) -> Option<Vec<u32>> {
    match ends {
        Some(e) if e.len() == 1 && e[0] as usize == total_points => None,
        Some(e) => Some(e.clone()),
        None => None,
    }
}

/// Encodes an in-memory geometry into a node of the destination buffer
/// (§4.1). `declared_type` is the layer's header type; `Unknown` falls
/// back to the geometry's own tag for the outer node.
pub fn encode<'a>(
    fbb: &mut FlatBufferBuilder<'a>,
    geometry: &Geometry,
    has_z: bool,
    has_m: bool,
    declared_type: GeometryType,
) -> Result<WIPOffset<geometry_generated::Geometry<'a>>, DecodeError> {
    let max_pairs = (FEATURE_MAX_BUFFER_SIZE as usize) / (2 * std::mem::size_of::<f64>());
    if total_point_count(geometry) > max_pairs {
        return Err(DecodeError::SizeOverflow);
    }
    let write_type = if matches!(declared_type, GeometryType::Unknown) {
        geometry.type_
    } else {
        declared_type
    };
    encode_node(fbb, geometry, has_z, has_m, write_type)
}

fn encode_node<'a>(
    fbb: &mut FlatBufferBuilder<'a>,
    g: &Geometry,
    has_z: bool,
    has_m: bool,
    write_type: GeometryType,
) -> Result<WIPOffset<geometry_generated::Geometry<'a>>, DecodeError> {
    if write_type.is_nested() {
        let mut child_offsets = Vec::with_capacity(g.parts.len());
        for part in &g.parts {
            if part.num_points() == 0 && part.parts.is_empty() {
                continue;
            }
            let part_write_type = match write_type {
                GeometryType::MultiPolygon => GeometryType::Polygon,
                _ => part.type_,
            };
            child_offsets.push(encode_node(fbb, part, has_z, has_m, part_write_type)?);
        }
        let parts_vec = fbb.create_vector(&child_offsets);
        return Ok(geometry_generated::Geometry::create(
            fbb,
            &GeometryArgs {
                type_: write_type.to_fb(),
                parts: Some(parts_vec),
                ..Default::default()
            },
        ));
    }

    let num_points = g.num_points();
    let xy = fbb.create_vector(&g.xy);

    let z = if has_z {
        let zz = g.z.as_deref().unwrap_or(&[]);
        check_len("z", num_points, zz.len())?;
        Some(fbb.create_vector(zz))
    } else {
        None
    };
    let m = if has_m {
        let mm = g.m.as_deref().unwrap_or(&[]);
        check_len("m", num_points, mm.len())?;
        Some(fbb.create_vector(mm))
    } else {
        None
    };

    let ends = match write_type {
        GeometryType::Polygon | GeometryType::Triangle | GeometryType::Tin => {
            normalize_ends(&g.ends, num_points)
        }
        GeometryType::MultiLineString => g.ends.clone().or(Some(Vec::new())),
        _ => None,
    }
    .map(|e| fbb.create_vector(&e));

    Ok(geometry_generated::Geometry::create(
        fbb,
        &GeometryArgs {
            ends,
            xy: Some(xy),
            z,
            m,
            type_: write_type.to_fb(),
            parts: None,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn point_roundtrip() {
        let g = point(1.0, 2.0);
        let mut fbb = FlatBufferBuilder::new();
        let off = encode(&mut fbb, &g, false, false, GeometryType::Point).unwrap();
        fbb.finish_minimal(off);
        let buf = fbb.finished_data();
        let node = flatbuffers::root::<geometry_generated::Geometry>(buf).unwrap();
        let decoded = decode(node, GeometryType::Point, false, false).unwrap();
        assert_eq!(decoded, g);
    }

    #[test]
    fn polygon_with_hole_omits_nothing_but_single_ring_omits_ends() {
        let exterior_only = Geometry {
            type_: GeometryType::Polygon,
            xy: vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, 0.0, 0.0],
            z: None,
            m: None,
            ends: Some(vec![5]),
            parts: Vec::new(),
        };
        let mut fbb = FlatBufferBuilder::new();
        let off = encode(&mut fbb, &exterior_only, false, false, GeometryType::Polygon).unwrap();
        fbb.finish_minimal(off);
        let node = flatbuffers::root::<geometry_generated::Geometry>(fbb.finished_data()).unwrap();
        assert!(node.ends().is_none());
        let decoded = decode(node, GeometryType::Polygon, false, false).unwrap();
        assert_eq!(decoded.ends, None);

        let with_hole = Geometry {
            ends: Some(vec![5, 10]),
            xy: {
                let mut v = exterior_only.xy.clone();
                v.extend_from_slice(&[2.0, 2.0, 4.0, 2.0, 4.0, 4.0, 2.0, 4.0, 2.0, 2.0]);
                v
            },
            ..exterior_only
        };
        let mut fbb = FlatBufferBuilder::new();
        let off = encode(&mut fbb, &with_hole, false, false, GeometryType::Polygon).unwrap();
        fbb.finish_minimal(off);
        let node = flatbuffers::root::<geometry_generated::Geometry>(fbb.finished_data()).unwrap();
        let decoded = decode(node, GeometryType::Polygon, false, false).unwrap();
        assert_eq!(decoded.ends, Some(vec![5, 10]));
    }

    #[test]
    fn multipolygon_forces_polygon_tag_on_parts() {
        let triangle_a = Geometry {
            type_: GeometryType::Polygon,
            xy: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            z: None,
            m: None,
            ends: None,
            parts: Vec::new(),
        };
        let triangle_b = Geometry {
            xy: vec![5.0, 5.0, 6.0, 5.0, 5.0, 6.0, 5.0, 5.0],
            ..triangle_a.clone()
        };
        let mp = Geometry {
            type_: GeometryType::MultiPolygon,
            xy: Vec::new(),
            z: None,
            m: None,
            ends: None,
            parts: vec![triangle_a, triangle_b],
        };
        let mut fbb = FlatBufferBuilder::new();
        let off = encode(&mut fbb, &mp, false, false, GeometryType::MultiPolygon).unwrap();
        fbb.finish_minimal(off);
        let node = flatbuffers::root::<geometry_generated::Geometry>(fbb.finished_data()).unwrap();
        let parts = node.parts().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.get(0).type_(), geometry_generated::GeometryType::Polygon);
        let decoded = decode(node, GeometryType::MultiPolygon, false, false).unwrap();
        assert_eq!(decoded.parts.len(), 2);
        assert_eq!(decoded.parts[0].xy.len(), 8);
    }

    #[test]
    fn wrong_z_dimensionality_is_rejected() {
        let g = Geometry {
            type_: GeometryType::LineString,
            xy: vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0],
            z: Some(vec![0.0, 1.0]),
            m: None,
            ends: None,
            parts: Vec::new(),
        };
        let mut fbb = FlatBufferBuilder::new();
        let err = encode(&mut fbb, &g, true, false, GeometryType::LineString).unwrap_err();
        assert!(matches!(err, DecodeError::WrongDimensionalityArray { .. }));
    }
}
