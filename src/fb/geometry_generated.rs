// Hand-written in the shape `flatc --rust` would emit for the `Geometry`
// table and `GeometryType` enum of this format's `.fbs` schema. Kept in its
// own generated-style module, as the teacher keeps `geometry_generated.rs`
// separate from `header_generated.rs`/`feature_generated.rs` in
// `fcb_core::fb`.
#![allow(non_upper_case_globals)]

use flatbuffers::{EndianScalar, Follow};

/// Geometry type tag (§3). Represented the way flatc represents a scalar
/// `.fbs` enum since flatbuffers 23: a transparent newtype over the
/// storage type with associated-const variants, not a native Rust `enum`
/// (that would forbid unknown-but-valid wire values round-tripping).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct GeometryType(pub u8);

#[allow(non_upper_case_globals)]
impl GeometryType {
    pub const Unknown: Self = Self(0);
    pub const Point: Self = Self(1);
    pub const MultiPoint: Self = Self(2);
    pub const LineString: Self = Self(3);
    pub const MultiLineString: Self = Self(4);
    pub const Polygon: Self = Self(5);
    pub const MultiPolygon: Self = Self(6);
    pub const GeometryCollection: Self = Self(7);
    pub const CircularString: Self = Self(8);
    pub const CompoundCurve: Self = Self(9);
    pub const CurvePolygon: Self = Self(10);
    pub const MultiCurve: Self = Self(11);
    pub const MultiSurface: Self = Self(12);
    pub const PolyhedralSurface: Self = Self(13);
    pub const Tin: Self = Self(14);
    pub const Triangle: Self = Self(15);

    pub const ENUM_MIN: u8 = 0;
    pub const ENUM_MAX: u8 = 15;
    pub const ENUM_VALUES: &'static [Self] = &[
        Self::Unknown,
        Self::Point,
        Self::MultiPoint,
        Self::LineString,
        Self::MultiLineString,
        Self::Polygon,
        Self::MultiPolygon,
        Self::GeometryCollection,
        Self::CircularString,
        Self::CompoundCurve,
        Self::CurvePolygon,
        Self::MultiCurve,
        Self::MultiSurface,
        Self::PolyhedralSurface,
        Self::Tin,
        Self::Triangle,
    ];

    pub fn variant_name(self) -> Option<&'static str> {
        Some(match self {
            Self::Unknown => "Unknown",
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
            Self::CircularString => "CircularString",
            Self::CompoundCurve => "CompoundCurve",
            Self::CurvePolygon => "CurvePolygon",
            Self::MultiCurve => "MultiCurve",
            Self::MultiSurface => "MultiSurface",
            Self::PolyhedralSurface => "PolyhedralSurface",
            Self::Tin => "Tin",
            Self::Triangle => "Triangle",
            _ => return None,
        })
    }
}

impl std::fmt::Debug for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.variant_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "<UNKNOWN {:?}>", self.0),
        }
    }
}

impl<'a> Follow<'a> for GeometryType {
    type Inner = Self;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        let b = flatbuffers::read_scalar_at::<u8>(buf, loc);
        Self(b)
    }
}

impl flatbuffers::Push for GeometryType {
    type Output = GeometryType;
    #[inline]
    unsafe fn push(&self, dst: &mut [u8], _written_len: usize) {
        flatbuffers::emplace_scalar::<u8>(dst, self.0);
    }
}

impl EndianScalar for GeometryType {
    type Scalar = u8;
    #[inline]
    fn to_little_endian(self) -> u8 {
        self.0.to_le()
    }
    #[inline]
    fn from_little_endian(v: u8) -> Self {
        Self(u8::from_le(v))
    }
}

impl<'a> flatbuffers::Verifiable for GeometryType {
    #[inline]
    fn run_verifier(
        v: &mut flatbuffers::Verifier,
        pos: usize,
    ) -> Result<(), flatbuffers::InvalidFlatbuffer> {
        u8::run_verifier(v, pos)
    }
}

impl flatbuffers::SimpleToVerifyInSlice for GeometryType {}

/// `table Geometry { ends: [uint]; xy: [double]; z: [double]; m: [double];
///   type: GeometryType; parts: [Geometry]; }`
///
/// One node of the flat parallel-array geometry tree (§3). Nested types
/// recurse through `parts`; flat types never set it.
#[derive(Copy, Clone, PartialEq)]
pub struct Geometry<'a> {
    pub _tab: flatbuffers::Table<'a>,
}

impl<'a> Follow<'a> for Geometry<'a> {
    type Inner = Geometry<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Geometry {
            _tab: flatbuffers::Table::new(buf, loc),
        }
    }
}

impl<'a> Geometry<'a> {
    pub const VT_ENDS: flatbuffers::VOffsetT = 4;
    pub const VT_XY: flatbuffers::VOffsetT = 6;
    pub const VT_Z: flatbuffers::VOffsetT = 8;
    pub const VT_M: flatbuffers::VOffsetT = 10;
    pub const VT_TYPE_: flatbuffers::VOffsetT = 12;
    pub const VT_PARTS: flatbuffers::VOffsetT = 14;

    #[inline]
    pub unsafe fn init_from_table(table: flatbuffers::Table<'a>) -> Self {
        Geometry { _tab: table }
    }

    #[allow(unused_mut)]
    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        _fbb: &'mut_bldr mut flatbuffers::FlatBufferBuilder<'bldr>,
        args: &'args GeometryArgs<'args>,
    ) -> flatbuffers::WIPOffset<Geometry<'bldr>> {
        let mut builder = GeometryBuilder::new(_fbb);
        if let Some(x) = args.parts {
            builder.add_parts(x);
        }
        if let Some(x) = args.m {
            builder.add_m(x);
        }
        if let Some(x) = args.z {
            builder.add_z(x);
        }
        if let Some(x) = args.xy {
            builder.add_xy(x);
        }
        if let Some(x) = args.ends {
            builder.add_ends(x);
        }
        builder.add_type_(args.type_);
        builder.finish()
    }

    #[inline]
    pub fn ends(&self) -> Option<flatbuffers::Vector<'a, u32>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'a, u32>>>(
                    Self::VT_ENDS,
                    None,
                )
        }
    }

    #[inline]
    pub fn xy(&self) -> Option<flatbuffers::Vector<'a, f64>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'a, f64>>>(
                    Self::VT_XY,
                    None,
                )
        }
    }

    #[inline]
    pub fn z(&self) -> Option<flatbuffers::Vector<'a, f64>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'a, f64>>>(Self::VT_Z, None)
        }
    }

    #[inline]
    pub fn m(&self) -> Option<flatbuffers::Vector<'a, f64>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'a, f64>>>(Self::VT_M, None)
        }
    }

    #[inline]
    pub fn type_(&self) -> GeometryType {
        unsafe {
            self._tab
                .get::<GeometryType>(Self::VT_TYPE_, Some(GeometryType::Unknown))
                .unwrap()
        }
    }

    #[inline]
    pub fn parts(
        &self,
    ) -> Option<flatbuffers::Vector<'a, flatbuffers::ForwardsUOffset<Geometry<'a>>>> {
        unsafe {
            self._tab.get::<flatbuffers::ForwardsUOffset<
                flatbuffers::Vector<'a, flatbuffers::ForwardsUOffset<Geometry<'a>>>,
            >>(Self::VT_PARTS, None)
        }
    }
}

impl flatbuffers::Verifiable for Geometry<'_> {
    #[inline]
    fn run_verifier(
        v: &mut flatbuffers::Verifier,
        pos: usize,
    ) -> Result<(), flatbuffers::InvalidFlatbuffer> {
        use flatbuffers::Verifiable;
        v.visit_table(pos)?
            .visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<u32>>>(
                "ends",
                Self::VT_ENDS,
                false,
            )?
            .visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<f64>>>(
                "xy",
                Self::VT_XY,
                false,
            )?
            .visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<f64>>>(
                "z", Self::VT_Z, false,
            )?
            .visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<f64>>>(
                "m", Self::VT_M, false,
            )?
            .visit_field::<GeometryType>("type_", Self::VT_TYPE_, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<
                flatbuffers::Vector<flatbuffers::ForwardsUOffset<Geometry>>,
            >>("parts", Self::VT_PARTS, false)?
            .finish();
        Ok(())
    }
}

pub struct GeometryArgs<'a> {
    pub ends: Option<flatbuffers::WIPOffset<flatbuffers::Vector<'a, u32>>>,
    pub xy: Option<flatbuffers::WIPOffset<flatbuffers::Vector<'a, f64>>>,
    pub z: Option<flatbuffers::WIPOffset<flatbuffers::Vector<'a, f64>>>,
    pub m: Option<flatbuffers::WIPOffset<flatbuffers::Vector<'a, f64>>>,
    pub type_: GeometryType,
    pub parts: Option<
        flatbuffers::WIPOffset<flatbuffers::Vector<'a, flatbuffers::ForwardsUOffset<Geometry<'a>>>>,
    >,
}

impl<'a> Default for GeometryArgs<'a> {
    fn default() -> Self {
        GeometryArgs {
            ends: None,
            xy: None,
            z: None,
            m: None,
            type_: GeometryType::Unknown,
            parts: None,
        }
    }
}

pub struct GeometryBuilder<'a: 'b, 'b> {
    fbb_: &'b mut flatbuffers::FlatBufferBuilder<'a>,
    start_: flatbuffers::WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a: 'b, 'b> GeometryBuilder<'a, 'b> {
    #[inline]
    pub fn add_ends(&mut self, ends: flatbuffers::WIPOffset<flatbuffers::Vector<'b, u32>>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Geometry::VT_ENDS, ends);
    }
    #[inline]
    pub fn add_xy(&mut self, xy: flatbuffers::WIPOffset<flatbuffers::Vector<'b, f64>>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Geometry::VT_XY, xy);
    }
    #[inline]
    pub fn add_z(&mut self, z: flatbuffers::WIPOffset<flatbuffers::Vector<'b, f64>>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Geometry::VT_Z, z);
    }
    #[inline]
    pub fn add_m(&mut self, m: flatbuffers::WIPOffset<flatbuffers::Vector<'b, f64>>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Geometry::VT_M, m);
    }
    #[inline]
    pub fn add_type_(&mut self, type_: GeometryType) {
        self.fbb_
            .push_slot::<GeometryType>(Geometry::VT_TYPE_, type_, GeometryType::Unknown);
    }
    #[inline]
    pub fn add_parts(
        &mut self,
        parts: flatbuffers::WIPOffset<
            flatbuffers::Vector<'b, flatbuffers::ForwardsUOffset<Geometry<'b>>>,
        >,
    ) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Geometry::VT_PARTS, parts);
    }
    #[inline]
    pub fn new(_fbb: &'b mut flatbuffers::FlatBufferBuilder<'a>) -> GeometryBuilder<'a, 'b> {
        let start = _fbb.start_table();
        GeometryBuilder {
            fbb_: _fbb,
            start_: start,
        }
    }
    #[inline]
    pub fn finish(self) -> flatbuffers::WIPOffset<Geometry<'a>> {
        let o = self.fbb_.end_table(self.start_);
        flatbuffers::WIPOffset::new(o.value())
    }
}

impl std::fmt::Debug for Geometry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Geometry")
            .field("type_", &self.type_())
            .finish()
    }
}
