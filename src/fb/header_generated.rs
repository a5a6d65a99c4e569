// Hand-written in flatc's generated shape for the `Crs`, `Column`, and
// `Header` tables (§3, §4.4). Kept separate from `geometry_generated.rs`
// and `feature_generated.rs` the way the teacher keeps one generated
// module per root table family.
#![allow(non_upper_case_globals)]

use flatbuffers::Follow;

/// `table Crs { org: string; code: int; name: string; description: string;
///   wkt: string; }`
#[derive(Copy, Clone, PartialEq)]
pub struct Crs<'a> {
    pub _tab: flatbuffers::Table<'a>,
}

impl<'a> Follow<'a> for Crs<'a> {
    type Inner = Crs<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Crs {
            _tab: flatbuffers::Table::new(buf, loc),
        }
    }
}

impl<'a> Crs<'a> {
    pub const VT_ORG: flatbuffers::VOffsetT = 4;
    pub const VT_CODE: flatbuffers::VOffsetT = 6;
    pub const VT_NAME: flatbuffers::VOffsetT = 8;
    pub const VT_DESCRIPTION: flatbuffers::VOffsetT = 10;
    pub const VT_WKT: flatbuffers::VOffsetT = 12;

    #[inline]
    pub unsafe fn init_from_table(table: flatbuffers::Table<'a>) -> Self {
        Crs { _tab: table }
    }

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        _fbb: &'mut_bldr mut flatbuffers::FlatBufferBuilder<'bldr>,
        args: &'args CrsArgs<'args>,
    ) -> flatbuffers::WIPOffset<Crs<'bldr>> {
        let mut builder = CrsBuilder::new(_fbb);
        if let Some(x) = args.wkt {
            builder.add_wkt(x);
        }
        if let Some(x) = args.description {
            builder.add_description(x);
        }
        if let Some(x) = args.name {
            builder.add_name(x);
        }
        builder.add_code(args.code);
        if let Some(x) = args.org {
            builder.add_org(x);
        }
        builder.finish()
    }

    #[inline]
    pub fn org(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_ORG, None)
        }
    }
    #[inline]
    pub fn code(&self) -> i32 {
        unsafe { self._tab.get::<i32>(Self::VT_CODE, Some(0)).unwrap() }
    }
    #[inline]
    pub fn name(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_NAME, None)
        }
    }
    #[inline]
    pub fn description(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_DESCRIPTION, None)
        }
    }
    #[inline]
    pub fn wkt(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_WKT, None)
        }
    }
}

impl flatbuffers::Verifiable for Crs<'_> {
    fn run_verifier(
        v: &mut flatbuffers::Verifier,
        pos: usize,
    ) -> Result<(), flatbuffers::InvalidFlatbuffer> {
        use flatbuffers::Verifiable;
        v.visit_table(pos)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>("org", Self::VT_ORG, false)?
            .visit_field::<i32>("code", Self::VT_CODE, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>("name", Self::VT_NAME, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>(
                "description",
                Self::VT_DESCRIPTION,
                false,
            )?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>("wkt", Self::VT_WKT, false)?
            .finish();
        Ok(())
    }
}

#[derive(Default)]
pub struct CrsArgs<'a> {
    pub org: Option<flatbuffers::WIPOffset<&'a str>>,
    pub code: i32,
    pub name: Option<flatbuffers::WIPOffset<&'a str>>,
    pub description: Option<flatbuffers::WIPOffset<&'a str>>,
    pub wkt: Option<flatbuffers::WIPOffset<&'a str>>,
}

pub struct CrsBuilder<'a: 'b, 'b> {
    fbb_: &'b mut flatbuffers::FlatBufferBuilder<'a>,
    start_: flatbuffers::WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a: 'b, 'b> CrsBuilder<'a, 'b> {
    #[inline]
    pub fn add_org(&mut self, org: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Crs::VT_ORG, org);
    }
    #[inline]
    pub fn add_code(&mut self, code: i32) {
        self.fbb_.push_slot::<i32>(Crs::VT_CODE, code, 0);
    }
    #[inline]
    pub fn add_name(&mut self, name: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Crs::VT_NAME, name);
    }
    #[inline]
    pub fn add_description(&mut self, description: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Crs::VT_DESCRIPTION, description);
    }
    #[inline]
    pub fn add_wkt(&mut self, wkt: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Crs::VT_WKT, wkt);
    }
    #[inline]
    pub fn new(_fbb: &'b mut flatbuffers::FlatBufferBuilder<'a>) -> CrsBuilder<'a, 'b> {
        let start = _fbb.start_table();
        CrsBuilder {
            fbb_: _fbb,
            start_: start,
        }
    }
    #[inline]
    pub fn finish(self) -> flatbuffers::WIPOffset<Crs<'a>> {
        let o = self.fbb_.end_table(self.start_);
        flatbuffers::WIPOffset::new(o.value())
    }
}

/// `table Column { name: string (required); type: ubyte; title: string;
///   description: string; width: int = -1; precision: int = -1;
///   scale: int = -1; nullable: bool = true; unique_: bool = false;
///   primary_key: bool = false; }`
#[derive(Copy, Clone, PartialEq)]
pub struct Column<'a> {
    pub _tab: flatbuffers::Table<'a>,
}

impl<'a> Follow<'a> for Column<'a> {
    type Inner = Column<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Column {
            _tab: flatbuffers::Table::new(buf, loc),
        }
    }
}

impl<'a> Column<'a> {
    pub const VT_NAME: flatbuffers::VOffsetT = 4;
    pub const VT_TYPE_: flatbuffers::VOffsetT = 6;
    pub const VT_TITLE: flatbuffers::VOffsetT = 8;
    pub const VT_DESCRIPTION: flatbuffers::VOffsetT = 10;
    pub const VT_WIDTH: flatbuffers::VOffsetT = 12;
    pub const VT_PRECISION: flatbuffers::VOffsetT = 14;
    pub const VT_SCALE: flatbuffers::VOffsetT = 16;
    pub const VT_NULLABLE: flatbuffers::VOffsetT = 18;
    pub const VT_UNIQUE_: flatbuffers::VOffsetT = 20;
    pub const VT_PRIMARY_KEY: flatbuffers::VOffsetT = 22;

    #[inline]
    pub unsafe fn init_from_table(table: flatbuffers::Table<'a>) -> Self {
        Column { _tab: table }
    }

    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        _fbb: &'mut_bldr mut flatbuffers::FlatBufferBuilder<'bldr>,
        args: &'args ColumnArgs<'args>,
    ) -> flatbuffers::WIPOffset<Column<'bldr>> {
        let mut builder = ColumnBuilder::new(_fbb);
        builder.add_scale(args.scale);
        builder.add_precision(args.precision);
        builder.add_width(args.width);
        if let Some(x) = args.description {
            builder.add_description(x);
        }
        if let Some(x) = args.title {
            builder.add_title(x);
        }
        builder.add_name(args.name);
        builder.add_primary_key(args.primary_key);
        builder.add_unique_(args.unique_);
        builder.add_nullable(args.nullable);
        builder.add_type_(args.type_);
        builder.finish()
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_NAME, None)
                .unwrap()
        }
    }
    #[inline]
    pub fn type_(&self) -> u8 {
        unsafe { self._tab.get::<u8>(Self::VT_TYPE_, Some(0)).unwrap() }
    }
    #[inline]
    pub fn title(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_TITLE, None)
        }
    }
    #[inline]
    pub fn description(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_DESCRIPTION, None)
        }
    }
    #[inline]
    pub fn width(&self) -> i32 {
        unsafe { self._tab.get::<i32>(Self::VT_WIDTH, Some(-1)).unwrap() }
    }
    #[inline]
    pub fn precision(&self) -> i32 {
        unsafe { self._tab.get::<i32>(Self::VT_PRECISION, Some(-1)).unwrap() }
    }
    #[inline]
    pub fn scale(&self) -> i32 {
        unsafe { self._tab.get::<i32>(Self::VT_SCALE, Some(-1)).unwrap() }
    }
    #[inline]
    pub fn nullable(&self) -> bool {
        unsafe { self._tab.get::<bool>(Self::VT_NULLABLE, Some(true)).unwrap() }
    }
    #[inline]
    pub fn unique_(&self) -> bool {
        unsafe { self._tab.get::<bool>(Self::VT_UNIQUE_, Some(false)).unwrap() }
    }
    #[inline]
    pub fn primary_key(&self) -> bool {
        unsafe {
            self._tab
                .get::<bool>(Self::VT_PRIMARY_KEY, Some(false))
                .unwrap()
        }
    }
}

impl flatbuffers::Verifiable for Column<'_> {
    fn run_verifier(
        v: &mut flatbuffers::Verifier,
        pos: usize,
    ) -> Result<(), flatbuffers::InvalidFlatbuffer> {
        use flatbuffers::Verifiable;
        v.visit_table(pos)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>("name", Self::VT_NAME, true)?
            .visit_field::<u8>("type_", Self::VT_TYPE_, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>("title", Self::VT_TITLE, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>(
                "description",
                Self::VT_DESCRIPTION,
                false,
            )?
            .visit_field::<i32>("width", Self::VT_WIDTH, false)?
            .visit_field::<i32>("precision", Self::VT_PRECISION, false)?
            .visit_field::<i32>("scale", Self::VT_SCALE, false)?
            .visit_field::<bool>("nullable", Self::VT_NULLABLE, false)?
            .visit_field::<bool>("unique_", Self::VT_UNIQUE_, false)?
            .visit_field::<bool>("primary_key", Self::VT_PRIMARY_KEY, false)?
            .finish();
        Ok(())
    }
}

pub struct ColumnArgs<'a> {
    pub name: flatbuffers::WIPOffset<&'a str>,
    pub type_: u8,
    pub title: Option<flatbuffers::WIPOffset<&'a str>>,
    pub description: Option<flatbuffers::WIPOffset<&'a str>>,
    pub width: i32,
    pub precision: i32,
    pub scale: i32,
    pub nullable: bool,
    pub unique_: bool,
    pub primary_key: bool,
}

pub struct ColumnBuilder<'a: 'b, 'b> {
    fbb_: &'b mut flatbuffers::FlatBufferBuilder<'a>,
    start_: flatbuffers::WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a: 'b, 'b> ColumnBuilder<'a, 'b> {
    #[inline]
    pub fn add_name(&mut self, name: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Column::VT_NAME, name);
    }
    #[inline]
    pub fn add_type_(&mut self, type_: u8) {
        self.fbb_.push_slot::<u8>(Column::VT_TYPE_, type_, 0);
    }
    #[inline]
    pub fn add_title(&mut self, title: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Column::VT_TITLE, title);
    }
    #[inline]
    pub fn add_description(&mut self, description: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Column::VT_DESCRIPTION, description);
    }
    #[inline]
    pub fn add_width(&mut self, width: i32) {
        self.fbb_.push_slot::<i32>(Column::VT_WIDTH, width, -1);
    }
    #[inline]
    pub fn add_precision(&mut self, precision: i32) {
        self.fbb_
            .push_slot::<i32>(Column::VT_PRECISION, precision, -1);
    }
    #[inline]
    pub fn add_scale(&mut self, scale: i32) {
        self.fbb_.push_slot::<i32>(Column::VT_SCALE, scale, -1);
    }
    #[inline]
    pub fn add_nullable(&mut self, nullable: bool) {
        self.fbb_
            .push_slot::<bool>(Column::VT_NULLABLE, nullable, true);
    }
    #[inline]
    pub fn add_unique_(&mut self, unique_: bool) {
        self.fbb_
            .push_slot::<bool>(Column::VT_UNIQUE_, unique_, false);
    }
    #[inline]
    pub fn add_primary_key(&mut self, primary_key: bool) {
        self.fbb_
            .push_slot::<bool>(Column::VT_PRIMARY_KEY, primary_key, false);
    }
    #[inline]
    pub fn new(_fbb: &'b mut flatbuffers::FlatBufferBuilder<'a>) -> ColumnBuilder<'a, 'b> {
        let start = _fbb.start_table();
        ColumnBuilder {
            fbb_: _fbb,
            start_: start,
        }
    }
    #[inline]
    pub fn finish(self) -> flatbuffers::WIPOffset<Column<'a>> {
        let o = self.fbb_.end_table(self.start_);
        flatbuffers::WIPOffset::new(o.value())
    }
}

/// `table Header { name: string; envelope: [double]; geometry_type: ubyte;
///   hasZ/hasM/hasT/hasTM: bool; columns: [Column]; features_count: ulong;
///   index_node_size: ushort; crs: Crs; title/description/metadata: string; }`
#[derive(Copy, Clone, PartialEq)]
pub struct Header<'a> {
    pub _tab: flatbuffers::Table<'a>,
}

impl<'a> Follow<'a> for Header<'a> {
    type Inner = Header<'a>;
    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        Header {
            _tab: flatbuffers::Table::new(buf, loc),
        }
    }
}

impl<'a> Header<'a> {
    pub const VT_NAME: flatbuffers::VOffsetT = 4;
    pub const VT_ENVELOPE: flatbuffers::VOffsetT = 6;
    pub const VT_GEOMETRY_TYPE: flatbuffers::VOffsetT = 8;
    pub const VT_HAS_Z: flatbuffers::VOffsetT = 10;
    pub const VT_HAS_M: flatbuffers::VOffsetT = 12;
    pub const VT_HAS_T: flatbuffers::VOffsetT = 14;
    pub const VT_HAS_TM: flatbuffers::VOffsetT = 16;
    pub const VT_COLUMNS: flatbuffers::VOffsetT = 18;
    pub const VT_FEATURES_COUNT: flatbuffers::VOffsetT = 20;
    pub const VT_INDEX_NODE_SIZE: flatbuffers::VOffsetT = 22;
    pub const VT_CRS: flatbuffers::VOffsetT = 24;
    pub const VT_TITLE: flatbuffers::VOffsetT = 26;
    pub const VT_DESCRIPTION: flatbuffers::VOffsetT = 28;
    pub const VT_METADATA: flatbuffers::VOffsetT = 30;

    #[inline]
    pub unsafe fn init_from_table(table: flatbuffers::Table<'a>) -> Self {
        Header { _tab: table }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
        _fbb: &'mut_bldr mut flatbuffers::FlatBufferBuilder<'bldr>,
        args: &'args HeaderArgs<'args>,
    ) -> flatbuffers::WIPOffset<Header<'bldr>> {
        let mut builder = HeaderBuilder::new(_fbb);
        builder.add_features_count(args.features_count);
        if let Some(x) = args.metadata {
            builder.add_metadata(x);
        }
        if let Some(x) = args.description {
            builder.add_description(x);
        }
        if let Some(x) = args.title {
            builder.add_title(x);
        }
        if let Some(x) = args.crs {
            builder.add_crs(x);
        }
        builder.add_index_node_size(args.index_node_size);
        if let Some(x) = args.columns {
            builder.add_columns(x);
        }
        if let Some(x) = args.envelope {
            builder.add_envelope(x);
        }
        if let Some(x) = args.name {
            builder.add_name(x);
        }
        builder.add_has_tm(args.has_tm);
        builder.add_has_t(args.has_t);
        builder.add_has_m(args.has_m);
        builder.add_has_z(args.has_z);
        builder.add_geometry_type(args.geometry_type);
        builder.finish()
    }

    #[inline]
    pub fn name(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_NAME, None)
        }
    }
    #[inline]
    pub fn envelope(&self) -> Option<flatbuffers::Vector<'a, f64>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'a, f64>>>(
                    Self::VT_ENVELOPE,
                    None,
                )
        }
    }
    #[inline]
    pub fn geometry_type(&self) -> u8 {
        unsafe {
            self._tab
                .get::<u8>(Self::VT_GEOMETRY_TYPE, Some(0))
                .unwrap()
        }
    }
    #[inline]
    pub fn has_z(&self) -> bool {
        unsafe { self._tab.get::<bool>(Self::VT_HAS_Z, Some(false)).unwrap() }
    }
    #[inline]
    pub fn has_m(&self) -> bool {
        unsafe { self._tab.get::<bool>(Self::VT_HAS_M, Some(false)).unwrap() }
    }
    #[inline]
    pub fn has_t(&self) -> bool {
        unsafe { self._tab.get::<bool>(Self::VT_HAS_T, Some(false)).unwrap() }
    }
    #[inline]
    pub fn has_tm(&self) -> bool {
        unsafe {
            self._tab
                .get::<bool>(Self::VT_HAS_TM, Some(false))
                .unwrap()
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
    #[inline]
    pub fn features_count(&self) -> u64 {
        unsafe {
            self._tab
                .get::<u64>(Self::VT_FEATURES_COUNT, Some(0))
                .unwrap()
        }
    }
    #[inline]
    pub fn index_node_size(&self) -> u16 {
        unsafe {
            self._tab
                .get::<u16>(Self::VT_INDEX_NODE_SIZE, Some(0))
                .unwrap()
        }
    }
    #[inline]
    pub fn crs(&self) -> Option<Crs<'a>> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<Crs<'a>>>(Self::VT_CRS, None)
        }
    }
    #[inline]
    pub fn title(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_TITLE, None)
        }
    }
    #[inline]
    pub fn description(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_DESCRIPTION, None)
        }
    }
    #[inline]
    pub fn metadata(&self) -> Option<&'a str> {
        unsafe {
            self._tab
                .get::<flatbuffers::ForwardsUOffset<&str>>(Self::VT_METADATA, None)
        }
    }
}

impl flatbuffers::Verifiable for Header<'_> {
    fn run_verifier(
        v: &mut flatbuffers::Verifier,
        pos: usize,
    ) -> Result<(), flatbuffers::InvalidFlatbuffer> {
        use flatbuffers::Verifiable;
        v.visit_table(pos)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>("name", Self::VT_NAME, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<f64>>>(
                "envelope",
                Self::VT_ENVELOPE,
                false,
            )?
            .visit_field::<u8>("geometry_type", Self::VT_GEOMETRY_TYPE, false)?
            .visit_field::<bool>("has_z", Self::VT_HAS_Z, false)?
            .visit_field::<bool>("has_m", Self::VT_HAS_M, false)?
            .visit_field::<bool>("has_t", Self::VT_HAS_T, false)?
            .visit_field::<bool>("has_tm", Self::VT_HAS_TM, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<
                flatbuffers::Vector<flatbuffers::ForwardsUOffset<Column>>,
            >>("columns", Self::VT_COLUMNS, false)?
            .visit_field::<u64>("features_count", Self::VT_FEATURES_COUNT, false)?
            .visit_field::<u16>("index_node_size", Self::VT_INDEX_NODE_SIZE, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<Crs>>("crs", Self::VT_CRS, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>("title", Self::VT_TITLE, false)?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>(
                "description",
                Self::VT_DESCRIPTION,
                false,
            )?
            .visit_field::<flatbuffers::ForwardsUOffset<&str>>(
                "metadata",
                Self::VT_METADATA,
                false,
            )?
            .finish();
        Ok(())
    }
}

#[derive(Default)]
pub struct HeaderArgs<'a> {
    pub name: Option<flatbuffers::WIPOffset<&'a str>>,
    pub envelope: Option<flatbuffers::WIPOffset<flatbuffers::Vector<'a, f64>>>,
    pub geometry_type: u8,
    pub has_z: bool,
    pub has_m: bool,
    pub has_t: bool,
    pub has_tm: bool,
    pub columns: Option<
        flatbuffers::WIPOffset<flatbuffers::Vector<'a, flatbuffers::ForwardsUOffset<Column<'a>>>>,
    >,
    pub features_count: u64,
    pub index_node_size: u16,
    pub crs: Option<flatbuffers::WIPOffset<Crs<'a>>>,
    pub title: Option<flatbuffers::WIPOffset<&'a str>>,
    pub description: Option<flatbuffers::WIPOffset<&'a str>>,
    pub metadata: Option<flatbuffers::WIPOffset<&'a str>>,
}

pub struct HeaderBuilder<'a: 'b, 'b> {
    fbb_: &'b mut flatbuffers::FlatBufferBuilder<'a>,
    start_: flatbuffers::WIPOffset<flatbuffers::TableUnfinishedWIPOffset>,
}

impl<'a: 'b, 'b> HeaderBuilder<'a, 'b> {
    #[inline]
    pub fn add_name(&mut self, name: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Header::VT_NAME, name);
    }
    #[inline]
    pub fn add_envelope(
        &mut self,
        envelope: flatbuffers::WIPOffset<flatbuffers::Vector<'b, f64>>,
    ) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Header::VT_ENVELOPE, envelope);
    }
    #[inline]
    pub fn add_geometry_type(&mut self, geometry_type: u8) {
        self.fbb_
            .push_slot::<u8>(Header::VT_GEOMETRY_TYPE, geometry_type, 0);
    }
    #[inline]
    pub fn add_has_z(&mut self, has_z: bool) {
        self.fbb_.push_slot::<bool>(Header::VT_HAS_Z, has_z, false);
    }
    #[inline]
    pub fn add_has_m(&mut self, has_m: bool) {
        self.fbb_.push_slot::<bool>(Header::VT_HAS_M, has_m, false);
    }
    #[inline]
    pub fn add_has_t(&mut self, has_t: bool) {
        self.fbb_.push_slot::<bool>(Header::VT_HAS_T, has_t, false);
    }
    #[inline]
    pub fn add_has_tm(&mut self, has_tm: bool) {
        self.fbb_
            .push_slot::<bool>(Header::VT_HAS_TM, has_tm, false);
    }
    #[inline]
    pub fn add_columns(
        &mut self,
        columns: flatbuffers::WIPOffset<
            flatbuffers::Vector<'b, flatbuffers::ForwardsUOffset<Column<'b>>>,
        >,
    ) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Header::VT_COLUMNS, columns);
    }
    #[inline]
    pub fn add_features_count(&mut self, features_count: u64) {
        self.fbb_
            .push_slot::<u64>(Header::VT_FEATURES_COUNT, features_count, 0);
    }
    #[inline]
    pub fn add_index_node_size(&mut self, index_node_size: u16) {
        self.fbb_
            .push_slot::<u16>(Header::VT_INDEX_NODE_SIZE, index_node_size, 0);
    }
    #[inline]
    pub fn add_crs(&mut self, crs: flatbuffers::WIPOffset<Crs<'b>>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Header::VT_CRS, crs);
    }
    #[inline]
    pub fn add_title(&mut self, title: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Header::VT_TITLE, title);
    }
    #[inline]
    pub fn add_description(&mut self, description: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Header::VT_DESCRIPTION, description);
    }
    #[inline]
    pub fn add_metadata(&mut self, metadata: flatbuffers::WIPOffset<&'b str>) {
        self.fbb_
            .push_slot_always::<flatbuffers::WIPOffset<_>>(Header::VT_METADATA, metadata);
    }
    #[inline]
    pub fn new(_fbb: &'b mut flatbuffers::FlatBufferBuilder<'a>) -> HeaderBuilder<'a, 'b> {
        let start = _fbb.start_table();
        HeaderBuilder {
            fbb_: _fbb,
            start_: start,
        }
    }
    #[inline]
    pub fn finish(self) -> flatbuffers::WIPOffset<Header<'a>> {
        let o = self.fbb_.end_table(self.start_);
        flatbuffers::WIPOffset::new(o.value())
    }
}

#[inline]
pub fn root_as_header(buf: &[u8]) -> Result<Header, flatbuffers::InvalidFlatbuffer> {
    flatbuffers::root::<Header>(buf)
}

#[inline]
pub fn root_as_header_unchecked(buf: &[u8]) -> Header {
    unsafe { flatbuffers::root_unchecked::<Header>(buf) }
}
