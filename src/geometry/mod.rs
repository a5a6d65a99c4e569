//! C1: the geometry codec (§4.1) — conversion between an in-memory,
//! recursive geometry tree and the flat parallel-array on-disk node.

mod codec;

pub use codec::{decode, encode};

use crate::error::DecodeError;

/// OGC geometry type tag, independent of the FlatBuffers wire enum in
/// [`crate::fb::geometry_generated`]. Kept as a real Rust enum here since
/// every value in-memory is meaningful; the wire type stays a newtype so
/// an as-yet-unknown tag round-trips through the table accessor without
/// panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeometryType {
    Unknown = 0,
    Point = 1,
    MultiPoint = 2,
    LineString = 3,
    MultiLineString = 4,
    Polygon = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
    CircularString = 8,
    CompoundCurve = 9,
    CurvePolygon = 10,
    MultiCurve = 11,
    MultiSurface = 12,
    PolyhedralSurface = 13,
    Tin = 14,
    Triangle = 15,
}

impl GeometryType {
    pub fn from_u8(v: u8) -> Result<Self, DecodeError> {
        Ok(match v {
            0 => Self::Unknown,
            1 => Self::Point,
            2 => Self::MultiPoint,
            3 => Self::LineString,
            4 => Self::MultiLineString,
            5 => Self::Polygon,
            6 => Self::MultiPolygon,
            7 => Self::GeometryCollection,
            8 => Self::CircularString,
            9 => Self::CompoundCurve,
            10 => Self::CurvePolygon,
            11 => Self::MultiCurve,
            12 => Self::MultiSurface,
            13 => Self::PolyhedralSurface,
            14 => Self::Tin,
            15 => Self::Triangle,
            other => return Err(DecodeError::UnsupportedType(other)),
        })
    }

    pub fn from_fb(t: crate::fb::geometry_generated::GeometryType) -> Result<Self, DecodeError> {
        Self::from_u8(t.0)
    }

    pub fn to_fb(self) -> crate::fb::geometry_generated::GeometryType {
        crate::fb::geometry_generated::GeometryType(self as u8)
    }

    fn is_nested(self) -> bool {
        matches!(
            self,
            Self::MultiPolygon
                | Self::GeometryCollection
                | Self::CompoundCurve
                | Self::CurvePolygon
                | Self::MultiCurve
                | Self::MultiSurface
                | Self::PolyhedralSurface
        )
    }
}

/// In-memory geometry tree (§9 Design Notes: a tagged sum type with a
/// recursive `parts` field, replacing the source's virtual hierarchy).
/// Flat leaf types carry coordinates directly; nested types carry only
/// `parts` and leave the coordinate arrays empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub type_: GeometryType,
    pub xy: Vec<f64>,
    pub z: Option<Vec<f64>>,
    pub m: Option<Vec<f64>>,
    pub ends: Option<Vec<u32>>,
    pub parts: Vec<Geometry>,
}

impl Geometry {
    pub fn empty(type_: GeometryType) -> Self {
        Geometry {
            type_,
            xy: Vec::new(),
            z: None,
            m: None,
            ends: None,
            parts: Vec::new(),
        }
    }

    /// Number of coordinate pairs directly owned by this node (0 for a
    /// purely nested node whose coordinates live in `parts`).
    pub fn num_points(&self) -> usize {
        self.xy.len() / 2
    }
}
