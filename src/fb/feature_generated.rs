// Hand-written in flatc's generated shape for the `Feature` table (§3, §6):
// the per-record FlatBuffer written after the header and optional index.
#![allow(non_upper_case_globals)]

use flatbuffers::Follow;

use super::geometry_generated::Geometry;
use super::header_generated::Column;

/// `table Feature { geometry: Geometry; properties: [ubyte];
///   columns: [Column]; }`
///
/// `columns`, per §3, overrides the dataset schema for this one feature;
/// reserved for future mixed-schema use and not currently emitted by the
/// writer.
#[derive(Copy, Clone, PartialEq)]
pub struct Feature<'a> {
    pub _tab: flatbuffers::Table<'a>,
}

impl<'a> Follow<'a> for Feature<'a> {
    type Inner = Feature<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Feature {
            _tab: flatbuffers::Table::new(buf, loc),
        }
    }
}

impl<'a> Feature<'a> {
    pub const VT_GEOMETRY: flatbuffers::VOffsetT = 4;
    pub const VT_PROPERTIES: flatbuffers::VOffsetT = 6;
    pub const VT_COLUMNS: flatbuffers::VOffsetT = 8;

    #[inline]
    pub unsafe fn init_from_table(table: flatbuffers::Table<'a>) -> Self {
        Feature { _tab: table }
    }

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        _fbb: &'mut_bldr mut flatbuffers::FlatBufferBuilder<'bldr>,
        args: &'args FeatureArgs<'args>,
    ) -> flatbuffers::WIPOffset<Feature<'bldr>> {
        let mut builder = FeatureBuilder::new(_fbb);
        if let Some(x) = args.columns {
            builder.add_columns(x);
        }
        if let Some(x) = args.properties {
            builder.add_properties(x);
        }
        if let Some(x) = args.geometry {
            builder.add_geometry(x);
        }
        builder.finish()
    }

    #[inline]
    pub fn geometry(&self) -> Option<Geometry<'a>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<Geometry<'a>>>(Self::VT_GEOMETRY, None)
        }
    }
    #[inline]
    pub fn properties(&self) -> Option<flatbuffers::Vector<'a, u8>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'a, u8>>>(
                    Self::VT_PROPERTIES,
                    None,
                )
        }
    }
    #[inline]
    pub fn columns(
        &self,
    ) -> Option<flatbuffers::Vector<'a, flatbuffers::ForwardsUOffset<Column<'a>>>> {
        unsafe {
            self._tab.get::<flatbuffers::ForwardsUOffset<
                flatbuffers::Vector<'a, flatbuffers::ForwardsUOffset<Column<'a>>>,
            >>(Self::VT_COLUMNS, None)
        }
    }
}

impl flatbuffers::Verifiable for Feature<'_> {
    fn run_verifier(
        v: &mut flatbuffers::Verifier,
        pos: usize,
    ) -> Result<(), flatbuffers::InvalidFlatbuffer> {
        use flatbuffers::Verifiable;
        v.visit_table(pos)?
            .visit_field::<flatbuffers::ForwardsUOffset<Geometry>>(
                "geometry",
                Self::VT_GEOMETRY,
                false,
            )?
            .visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<u8>>>(
                "properties",
                Self::VT_PROPERTIES,
                false,
            )?
            .visit_field::<flatbuffers::ForwardsUOffset<
                flatbuffers::Vector<flatbuffers::ForwardsUOffset<Column>>,
            >>("columns", Self::VT_COLUMNS, false)?
            .finish();
        Ok(())
    }
}

#[derive(Default)]
pub struct FeatureArgs<'a> {
    pub geometry: Option<flatbuffers::WIPOffset<Geometry<'a>>>,
    pub properties: Option<flatbuffers::WIPOffset<flatbuffers::Vector<'a, u8>>>,
    pub columns: Option<
        flatbuffers::WIPOffset<flatbuffers::Vector<'a, flatbuffers::ForwardsUOffset<Column<'a>>>>,
    >,
}

pub struct FeatureBuilder<'a: 'b, 'b> {
    fbb_: &'b mut flatbuffers::FlatBufferBuilder<'a>,
    start_: flatbuffers::WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a: 'b, 'b> FeatureBuilder<'a, 'b> {
    #[inline]
    pub fn add_geometry(&mut self, geometry: flatbuffers::WIPOffset<Geometry<'b>>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Feature::VT_GEOMETRY, geometry);
    }
    #[inline]
    pub fn add_properties(
        &mut self,
        properties: flatbuffers::WIPOffset<flatbuffers::Vector<'b, u8>>,
    ) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Feature::VT_PROPERTIES, properties);
    }
    #[inline]
    pub fn add_columns(
        &mut self,
        columns: flatbuffers::WIPOffset<
            flatbuffers::Vector<'b, flatbuffers::ForwardsUOffset<Column<'b>>>,
        >,
    ) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Feature::VT_COLUMNS, columns);
    }
    #[inline]
    pub fn new(_fbb: &'b mut flatbuffers::FlatBufferBuilder<'a>) -> FeatureBuilder<'a, 'b> {
        let start = _fbb.start_table();
        FeatureBuilder {
            fbb_: _fbb,
            start_: start,
        }
    }
    #[inline]
    pub fn finish(self) -> flatbuffers::WIPOffset<Feature<'a>> {
        let o = self.fbb_.end_table(self.start_);
        flatbuffers::WIPOffset::new(o.value())
    }
}

#[inline]
pub fn root_as_feature(buf: &[u8]) -> Result<Feature, flatbuffers::InvalidFlatbuffer> {
    flatbuffers::root::<Feature>(buf)
}
