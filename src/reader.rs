//! C5: the reader (§4.5) — open a file, parse the header, optionally
//! drive a spatial predicate through the packed R-tree, and iterate
//! features.

use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, trace};

use crate::consts::{
    FEATURE_BUF_INITIAL_CAPACITY, FEATURE_MAX_BUFFER_SIZE, FEATURE_SIZE_FAST_PATH,
    HEADER_MAX_BUFFER_SIZE, HEADER_SIZE_PREFIX_SIZE, MAGIC_BYTES_SIZE, NODE_ITEM_LEN, VERSION,
};
use crate::error::{Error, Result};
use crate::fb::feature_generated;
use crate::geometry::{self, Geometry};
use crate::header::{decode_column, decode_header, Header};
use crate::properties::{self, Column, PropertyValue};
use crate::rtree::{self, NodeItem, SearchResultItem};

/// A decoded feature (§3): optional geometry, a decoded property list,
/// and an optional per-feature column override (reserved for future
/// mixed-schema use; never emitted by this crate's writer).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    pub properties: Vec<(u16, PropertyValue)>,
    pub columns: Option<Vec<Column>>,
}

/// An attribute predicate, evaluated after parse (§4.5): return `false`
/// to skip a feature.
pub type AttributeFilter = Box<dyn FnMut(&Feature) -> bool + Send>;

/// Reader-side configuration (§6).
pub struct ReaderOptions {
    /// Validate internal FlatBuffer offsets of the header and every
    /// feature before any field is accessed. Defaults to on.
    pub verify_buffers: bool,
    /// Skip geometry decoding entirely (§4.5 "honoring 'ignore geometry'
    /// when set").
    pub ignore_geometry: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            verify_buffers: true,
            ignore_geometry: false,
        }
    }
}

/// Progress of the optional spatial predicate against the packed R-tree.
enum SpatialState {
    /// No predicate installed; scan the feature stream sequentially.
    None,
    /// A predicate was installed but the index has not been consulted yet.
    Pending(NodeItem),
    /// The predicate's rectangle contained the whole dataset extent, so
    /// the index was skipped in favor of a sequential scan (§4.5).
    Skipped,
    /// The streaming search ran; remaining candidates to visit.
    Applied {
        candidates: Vec<SearchResultItem>,
        pos: usize,
    },
}

/// State captured by [`Reader::take_filters`] and restored by
/// [`Reader::restore_filters`] (used by the editable wrapper, §4.7, to
/// avoid leaking its internal rewrite scan into the caller's filters).
pub struct SavedFilters {
    spatial: SpatialState,
    attribute: Option<AttributeFilter>,
}

/// Opens a FlatGeobuf file, parses its header, and drives feature
/// iteration — sequential, by fid, or through a spatial/attribute
/// predicate (§4.5).
pub struct Reader<R> {
    source: R,
    header: Header,
    /// Absolute byte offset of the start of the packed R-tree (immediately
    /// after the header), regardless of whether an index is present.
    tree_offset: u64,
    /// Absolute byte offset of the start of the feature stream.
    features_offset: u64,
    /// Total length of `source` in bytes, captured at open time (§4.5
    /// "`current_offset + size ≤ file_size`").
    file_size: u64,
    options: ReaderOptions,
    buf: Vec<u8>,
    /// Current read position for sequential scanning (`None`/`Skipped`).
    cursor: u64,
    sequential_fid: u64,
    spatial: SpatialState,
    attribute_filter: Option<AttributeFilter>,
}

impl<R: Read + Seek> Reader<R> {
    /// Opens `source`, reading the magic bytes and header eagerly (§4.5).
    pub fn open(source: R) -> Result<Self> {
        Self::open_with_options(source, ReaderOptions::default())
    }

    pub fn open_with_options(mut source: R, options: ReaderOptions) -> Result<Self> {
        trace!("opening flatgeobuf source");

        let mut magic = [0u8; MAGIC_BYTES_SIZE];
        source.read_exact(&mut magic).map_err(|_| Error::NotAFile)?;
        let tail_matches = magic[0] == 0x66
            && magic[1] == 0x67
            && magic[2] == 0x62
            && magic[4] == 0x66
            && magic[5] == 0x67
            && magic[6] == 0x62
            && magic[7] == 0x01;
        if !tail_matches {
            return Err(Error::NotAFile);
        }
        if magic[3] != VERSION {
            return Err(Error::UnsupportedVersion(magic[3]));
        }

        let mut size_buf = [0u8; HEADER_SIZE_PREFIX_SIZE];
        source.read_exact(&mut size_buf)?;
        let header_size = u32::from_le_bytes(size_buf) as usize;
        if header_size > HEADER_MAX_BUFFER_SIZE {
            return Err(Error::InvalidSize(format!(
                "header size {header_size} exceeds the {HEADER_MAX_BUFFER_SIZE} byte cap"
            )));
        }
        let mut header_buf = vec![0u8; header_size];
        source.read_exact(&mut header_buf)?;
        let header = decode_header(&header_buf, options.verify_buffers)?;

        let tree_offset = (MAGIC_BYTES_SIZE + HEADER_SIZE_PREFIX_SIZE + header_size) as u64;
        let tree_size = if header.index_node_size > 0 {
            rtree::index_size(header.features_count as usize, header.index_node_size)?
        } else {
            0
        };
        let features_offset = tree_offset + tree_size;

        let resume_at = source.stream_position()?;
        let file_size = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(resume_at))?;

        Ok(Reader {
            source,
            header,
            tree_offset,
            features_offset,
            file_size,
            options,
            buf: Vec::with_capacity(FEATURE_BUF_INITIAL_CAPACITY),
            cursor: features_offset,
            sequential_fid: 0,
            spatial: SpatialState::None,
            attribute_filter: None,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Restores the scan position to the start of the feature stream and
    /// clears any cached spatial search result (§4.5).
    pub fn reset_reading(&mut self) {
        self.cursor = self.features_offset;
        self.sequential_fid = 0;
        self.spatial = SpatialState::None;
    }

    /// Installs (or clears, with `None`) a spatial predicate. The index
    /// is not consulted until the next [`Reader::get_next_feature`] call.
    pub fn set_spatial_filter(&mut self, rect: Option<NodeItem>) {
        self.spatial = match rect {
            Some(r) => SpatialState::Pending(r),
            None => SpatialState::None,
        };
    }

    /// Installs (or clears, with `None`) an attribute predicate (§4.5).
    pub fn set_attribute_filter(&mut self, filter: Option<AttributeFilter>) {
        self.attribute_filter = filter;
    }

    /// Detaches the current filters so the caller can run an unfiltered
    /// pass and restore them afterwards (§4.7).
    pub fn take_filters(&mut self) -> SavedFilters {
        SavedFilters {
            spatial: std::mem::replace(&mut self.spatial, SpatialState::None),
            attribute: self.attribute_filter.take(),
        }
    }

    pub fn restore_filters(&mut self, saved: SavedFilters) {
        self.spatial = saved.spatial;
        self.attribute_filter = saved.attribute;
    }

    /// Like [`Reader::restore_filters`], but for a reader that now points
    /// at a rewritten file (§4.7 sync): a resolved spatial search holds
    /// candidate byte offsets into the file as it was before the rewrite,
    /// which do not carry over, so it degrades to "no spatial filter"
    /// instead of replaying stale offsets. An unresolved predicate and any
    /// attribute filter carry over unchanged.
    pub fn restore_filters_after_rewrite(&mut self, saved: SavedFilters) {
        self.spatial = match saved.spatial {
            SpatialState::Applied { .. } => SpatialState::None,
            other => other,
        };
        self.attribute_filter = saved.attribute;
    }

    pub fn get_extent(&self) -> Option<[f64; 4]> {
        self.header.envelope
    }

    /// The dataset's feature count from the header when no predicate is
    /// active; otherwise falls back to full iteration (§4.5).
    pub fn get_feature_count(&mut self) -> Result<u64> {
        if matches!(self.spatial, SpatialState::None) && self.attribute_filter.is_none() {
            return Ok(self.header.features_count);
        }
        debug!("counting features via full iteration because a predicate is active");
        let saved_cursor = self.cursor;
        let saved_fid = self.sequential_fid;
        let saved_spatial = std::mem::replace(&mut self.spatial, SpatialState::None);
        self.reset_reading();
        self.spatial = saved_spatial;

        let mut count = 0u64;
        while self.get_next_feature()?.is_some() {
            count += 1;
        }

        self.cursor = saved_cursor;
        self.sequential_fid = saved_fid;
        Ok(count)
    }

    /// Random access by feature id (§4.5): requires a spatial index.
    pub fn get_feature(&mut self, fid: u64) -> Result<Feature> {
        if self.header.index_node_size == 0 {
            return Err(Error::NoIndex);
        }
        if fid >= self.header.features_count {
            return Err(Error::NotFound(fid));
        }
        let level_bounds = rtree::generate_level_bounds(
            self.header.features_count as usize,
            self.header.index_node_size,
        )?;
        let leaf_base = level_bounds
            .last()
            .expect("packed r-tree has at least one level")
            .0;
        let node_index = leaf_base + fid as usize;
        let node_pos = self.tree_offset + (node_index * NODE_ITEM_LEN) as u64;

        // Skip the four doubles; only the trailing `offset` field is needed.
        self.source.seek(SeekFrom::Start(node_pos + 32))?;
        let mut off_buf = [0u8; 8];
        self.source.read_exact(&mut off_buf)?;
        let feature_offset = u64::from_le_bytes(off_buf);

        self.source
            .seek(SeekFrom::Start(self.features_offset + feature_offset))?;
        let size = self.try_read_size()?.ok_or(Error::NotFound(fid))?;
        let body_start = self.source.stream_position()?;
        self.parse_feature_body(size, body_start)
    }

    /// Advances the cursor and returns the next feature, or `None` at
    /// end of stream. Applies the spatial predicate (consulting the
    /// index lazily on first call) and then the attribute predicate.
    pub fn get_next_feature(&mut self) -> Result<Option<Feature>> {
        loop {
            let next = match std::mem::replace(&mut self.spatial, SpatialState::None) {
                SpatialState::Pending(rect) => {
                    self.spatial = self.apply_spatial_predicate(rect)?;
                    continue;
                }
                other @ (SpatialState::None | SpatialState::Skipped) => {
                    self.spatial = other;
                    self.source.seek(SeekFrom::Start(self.cursor))?;
                    match self.try_read_size()? {
                        None => return Ok(None),
                        Some(size) => {
                            let body_start = self.source.stream_position()?;
                            let feature = self.parse_feature_body(size, body_start)?;
                            let fid = self.sequential_fid;
                            self.sequential_fid += 1;
                            self.cursor += HEADER_SIZE_PREFIX_SIZE as u64 + size as u64;
                            Some((feature, fid))
                        }
                    }
                }
                SpatialState::Applied {
                    candidates,
                    mut pos,
                } => {
                    if pos >= candidates.len() {
                        self.spatial = SpatialState::Applied { candidates, pos };
                        return Ok(None);
                    }
                    let item = candidates[pos];
                    pos += 1;
                    self.source
                        .seek(SeekFrom::Start(self.features_offset + item.offset))?;
                    let size = self.try_read_size()?.ok_or_else(|| {
                        Error::CorruptData("index points past the end of the file".into())
                    })?;
                    let body_start = self.source.stream_position()?;
                    let feature = self.parse_feature_body(size, body_start)?;
                    self.spatial = SpatialState::Applied { candidates, pos };
                    Some((feature, item.index as u64))
                }
            };

            let Some((feature, fid)) = next else {
                continue;
            };
            if let Some(mut filter) = self.attribute_filter.take() {
                let keep = filter(&feature);
                self.attribute_filter = Some(filter);
                if !keep {
                    debug!(fid, "feature skipped by attribute predicate");
                    continue;
                }
            }
            return Ok(Some(feature));
        }
    }

    fn apply_spatial_predicate(&mut self, rect: NodeItem) -> Result<SpatialState> {
        if self.header.index_node_size == 0 {
            return Err(Error::NoIndex);
        }
        if let Some(extent) = self.header.envelope {
            let extent_rect = NodeItem::new(extent[0], extent[1], extent[2], extent[3]);
            let contains = rect.min_x <= extent_rect.min_x
                && rect.min_y <= extent_rect.min_y
                && rect.max_x >= extent_rect.max_x
                && rect.max_y >= extent_rect.max_y;
            if contains {
                debug!("spatial predicate contains the whole dataset extent, skipping the index");
                return Ok(SpatialState::Skipped);
            }
        }
        trace!("running streaming search over the packed r-tree");
        self.source.seek(SeekFrom::Start(self.tree_offset))?;
        let candidates = rtree::stream_search(
            &mut self.source,
            self.header.features_count as usize,
            self.header.index_node_size,
            rect,
        )?;
        Ok(SpatialState::Applied {
            candidates,
            pos: 0,
        })
    }

    /// Reads the `u32 LE` size prefix of the next record, or `None` at
    /// end of stream (a clean zero-byte read). A short (1-3 byte) read
    /// is a truncated file.
    fn try_read_size(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; HEADER_SIZE_PREFIX_SIZE];
        let mut read_total = 0;
        loop {
            let n = self.source.read(&mut buf[read_total..])?;
            if n == 0 {
                break;
            }
            read_total += n;
            if read_total == buf.len() {
                break;
            }
        }
        if read_total == 0 {
            return Ok(None);
        }
        if read_total != buf.len() {
            return Err(Error::CorruptData(
                "feature stream truncated before a size prefix".into(),
            ));
        }
        Ok(Some(u32::from_le_bytes(buf)))
    }

    /// Parses one feature record's body (§4.5 "Feature parse procedure"):
    /// bound-checks `size`, grows the reusable buffer, reads the bytes,
    /// optionally verifies, then decodes geometry and properties.
    /// `body_start` is the source's byte offset right after the `u32 LE`
    /// size prefix, i.e. where `size` bytes are about to be read from.
    fn parse_feature_body(&mut self, size: u32, body_start: u64) -> Result<Feature> {
        let size_u64 = size as u64;
        let fast_path = size_u64 <= FEATURE_SIZE_FAST_PATH;
        if !fast_path {
            if size_u64 > FEATURE_MAX_BUFFER_SIZE {
                return Err(Error::InvalidSize(format!(
                    "feature of {size} bytes exceeds the {FEATURE_MAX_BUFFER_SIZE} byte cap"
                )));
            }
            if body_start + size_u64 > self.file_size {
                return Err(Error::InvalidSize(format!(
                    "feature of {size} bytes at offset {body_start} exceeds the {} byte file",
                    self.file_size
                )));
            }
        }

        let new_len = size as usize;
        if self.buf.capacity() < new_len {
            let mut cap = self.buf.capacity().max(FEATURE_BUF_INITIAL_CAPACITY);
            while cap < new_len {
                cap *= 2;
            }
            self.buf.reserve(cap - self.buf.capacity());
        }
        self.buf.resize(new_len, 0);
        self.source.read_exact(&mut self.buf[..new_len])?;

        let table = if self.options.verify_buffers {
            flatbuffers::root::<feature_generated::Feature>(&self.buf[..new_len])?
        } else {
            unsafe { flatbuffers::root_unchecked::<feature_generated::Feature>(&self.buf[..new_len]) }
        };

        let geometry = if self.options.ignore_geometry {
            None
        } else {
            table
                .geometry()
                .map(|g| {
                    geometry::decode(g, self.header.geometry_type, self.header.has_z, self.header.has_m)
                })
                .transpose()?
        };

        let columns = table
            .columns()
            .map(|cols| {
                (0..cols.len())
                    .map(|i| decode_column(cols.get(i)))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let effective_columns: &[Column] = columns.as_deref().unwrap_or(&self.header.columns);
        let properties = match table.properties() {
            Some(p) => properties::decode_properties(p.bytes(), effective_columns)?,
            None => Vec::new(),
        };

        Ok(Feature {
            geometry,
            properties,
            columns,
        })
    }
}

impl<R: Read + Seek> Iterator for Reader<R> {
    type Item = Result<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        self.get_next_feature().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryType;
    use crate::header::Header;
    use crate::properties::ColumnType;
    use crate::writer::Writer;
    use std::io::Cursor;

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

    fn write_single_point(spatial_index: bool) -> Vec<u8> {
        let columns = vec![Column::new("name", ColumnType::String)];
        let mut writer = Writer::create_with_options(
            GeometryType::Point,
            columns,
            crate::writer::WriterOptions {
                spatial_index,
                ..Default::default()
            },
        )
        .unwrap();
        writer
            .create_feature(
                Some(&point(1.0, 2.0)),
                &[(0, PropertyValue::String("Alice".into()))],
            )
            .unwrap();
        let mut out = Cursor::new(Vec::new());
        writer.close(&mut out).unwrap();
        out.into_inner()
    }

    #[test]
    fn open_rejects_bad_magic() {
        let err = Reader::open(Cursor::new(vec![0u8; 20])).unwrap_err();
        assert!(matches!(err, Error::NotAFile));
    }

    #[test]
    fn single_point_roundtrip_with_index() {
        let bytes = write_single_point(true);
        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.header().features_count, 1);
        assert_eq!(reader.get_extent(), Some([1.0, 2.0, 1.0, 2.0]));

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
    fn sequential_iteration_without_index() {
        let bytes = write_single_point(false);
        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.header().index_node_size, 0);
        let err = reader.get_feature(0).unwrap_err();
        assert!(matches!(err, Error::NoIndex));

        let feature = reader.get_next_feature().unwrap().unwrap();
        assert_eq!(feature.geometry, Some(point(1.0, 2.0)));
        assert!(reader.get_next_feature().unwrap().is_none());
    }

    #[test]
    fn spatial_query_matches_brute_force() {
        let columns: Vec<Column> = Vec::new();
        let mut writer =
            Writer::create_with_options(GeometryType::Point, columns, Default::default()).unwrap();
        let mut rng_state = 88172645463325252u64;
        let mut next = || {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;
            (rng_state % 1000) as f64 / 1000.0
        };
        let mut pts = Vec::new();
        for _ in 0..100u32 {
            let (x, y) = (next(), next());
            pts.push((x, y));
            writer.create_feature(Some(&point(x, y)), &[]).unwrap();
        }
        let mut out = Cursor::new(Vec::new());
        writer.close(&mut out).unwrap();

        let mut reader = Reader::open(Cursor::new(out.into_inner())).unwrap();
        let query = NodeItem::new(0.4, 0.4, 0.6, 0.6);
        reader.set_spatial_filter(Some(query));
        let mut found = Vec::new();
        while let Some(f) = reader.get_next_feature().unwrap() {
            let xy = f.geometry.unwrap().xy;
            found.push((xy[0], xy[1]));
        }

        let expected: Vec<(f64, f64)> = pts
            .iter()
            .copied()
            .filter(|&(x, y)| (0.4..=0.6).contains(&x) && (0.4..=0.6).contains(&y))
            .collect();
        assert_eq!(found.len(), expected.len());
        for p in &expected {
            assert!(found.contains(p));
        }
    }

    #[test]
    fn unknown_header_type_falls_back_to_empty_header() {
        let h = Header::default();
        assert_eq!(h.geometry_type, GeometryType::Unknown);
    }

    #[test]
    fn oversized_size_prefix_past_fast_path_is_rejected_without_matching_file_length() {
        let mut bytes = write_single_point(false);
        let header_size = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
        let features_offset = 12 + header_size;

        // Claim a body far larger than the fast-path threshold even though
        // the file is only a few dozen bytes long past this point.
        let bogus_size: u32 = 128 * 1024 * 1024;
        bytes[features_offset..features_offset + 4].copy_from_slice(&bogus_size.to_le_bytes());

        let mut reader = Reader::open(Cursor::new(bytes)).unwrap();
        let err = reader.get_next_feature().unwrap_err();
        assert!(matches!(err, Error::InvalidSize(_)));
    }
}
