//! C6: the writer (§4.6) — buffers features to a scratch file during the
//! first pass, then Hilbert-sorts them by bounding rectangle, builds the
//! packed R-tree over that order, and streams the final file out in a
//! second pass.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use flatbuffers::FlatBufferBuilder;
use tracing::{debug, trace};

use crate::consts::{
    FEATURES_COUNT_MAX, FEATURE_MAX_BUFFER_SIZE, FEATURE_SIZE_FAST_PATH, MAGIC_BYTES,
};
use crate::error::{Error, Result};
use crate::fb::feature_generated::{Feature as FbFeature, FeatureArgs};
use crate::geometry::{self, Geometry, GeometryType};
use crate::header::{encode_header, Crs, Header};
use crate::properties::{self, Column, PropertyValue};
use crate::rtree::{self, NodeItem, PackedRTree};

/// Writer-side configuration (§6).
pub struct WriterOptions {
    /// Build and emit a packed R-tree index. Defaults to on.
    pub spatial_index: bool,
    /// Leaf fanout of the packed R-tree, ignored when `spatial_index` is
    /// off. Defaults to [`PackedRTree::DEFAULT_NODE_SIZE`].
    pub index_node_size: u16,
    pub has_z: bool,
    pub has_m: bool,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub crs: Option<Crs>,
    /// Directory to place the first-pass scratch file in (§6). `None`
    /// uses the platform temp directory, matching the teacher's own
    /// `tempfile::tempfile()` default; either way the file is unlinked
    /// as soon as it is created so it never outlives the process.
    pub temporary_dir: Option<PathBuf>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            spatial_index: true,
            index_node_size: PackedRTree::DEFAULT_NODE_SIZE,
            has_z: false,
            has_m: false,
            name: None,
            title: None,
            description: None,
            metadata: None,
            crs: None,
            temporary_dir: None,
        }
    }
}

/// A buffered feature's position in the scratch file and its bounding
/// rectangle, recorded during the first pass.
struct PendingFeature {
    /// Byte offset of the size-prefixed record in the scratch file.
    offset: u64,
    /// Full record length, prefix included.
    len: u64,
    rect: NodeItem,
}

/// Accumulates features for a dataset and writes the final file on
/// [`Writer::close`] (§4.6).
pub struct Writer {
    scratch: File,
    geometry_type: GeometryType,
    has_z: bool,
    has_m: bool,
    columns: Vec<Column>,
    options: WriterOptions,
    pending: Vec<PendingFeature>,
    cursor: u64,
    extent: NodeItem,
    /// Largest single encoded feature record seen so far, prefix included
    /// (§4.6 "track `max_feature_size` for later sizing").
    max_feature_size: u64,
}

impl Writer {
    pub fn create(geometry_type: GeometryType, columns: Vec<Column>) -> Result<Self> {
        Self::create_with_options(geometry_type, columns, WriterOptions::default())
    }

    pub fn create_with_options(
        geometry_type: GeometryType,
        columns: Vec<Column>,
        options: WriterOptions,
    ) -> Result<Self> {
        trace!(?geometry_type, column_count = columns.len(), "creating writer");
        let scratch = match &options.temporary_dir {
            Some(dir) => tempfile::tempfile_in(dir)?,
            None => tempfile::tempfile()?,
        };
        Ok(Writer {
            scratch,
            geometry_type,
            has_z: options.has_z,
            has_m: options.has_m,
            columns,
            options,
            pending: Vec::new(),
            cursor: 0,
            extent: NodeItem::empty(),
            max_feature_size: 0,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn num_features(&self) -> u64 {
        self.pending.len() as u64
    }

    /// Encodes one feature and appends it to the scratch file (§4.6
    /// "Write-time sequencing"). `geometry`'s type must agree with the
    /// dataset's declared type unless that type is
    /// [`GeometryType::Unknown`]. A missing or empty geometry is not an
    /// error: the feature is skipped silently (debug-logged), matching
    /// the original driver's "skip writing feature without geometry".
    pub fn create_feature(
        &mut self,
        geometry: Option<&Geometry>,
        properties: &[(u16, PropertyValue)],
    ) -> Result<()> {
        if self.pending.len() as u64 >= FEATURES_COUNT_MAX {
            return Err(Error::InvalidSize(format!(
                "dataset already has the maximum of {FEATURES_COUNT_MAX} features"
            )));
        }
        let Some(geometry) = geometry.filter(|g| !is_empty_geometry(g)) else {
            debug!("skip writing feature without geometry");
            return Ok(());
        };
        if !matches!(self.geometry_type, GeometryType::Unknown) && geometry.type_ != self.geometry_type
        {
            return Err(Error::GeometryTypeMismatch {
                expected: self.geometry_type,
                actual: geometry.type_,
            });
        }

        let mut fbb = FlatBufferBuilder::new();
        let geometry_off = geometry::encode(&mut fbb, geometry, self.has_z, self.has_m, self.geometry_type)?;
        let geometry_off = Some(geometry_off);
        let props_bytes = properties::encode_properties(&self.columns, properties)?;
        let properties_off = if props_bytes.is_empty() {
            None
        } else {
            Some(fbb.create_vector(&props_bytes))
        };
        let args = FeatureArgs {
            geometry: geometry_off,
            properties: properties_off,
            columns: None,
        };
        let off = FbFeature::create(&mut fbb, &args);
        fbb.finish_size_prefixed(off, None);
        let record = fbb.finished_data();

        if record.len() as u64 > FEATURE_MAX_BUFFER_SIZE {
            return Err(Error::InvalidSize(format!(
                "feature of {} bytes exceeds the {FEATURE_MAX_BUFFER_SIZE} byte cap",
                record.len()
            )));
        }

        let rect = rect_of(geometry);
        self.extent.expand(&rect);

        let record_offset = self.cursor;
        self.scratch.write_all(record)?;
        self.cursor += record.len() as u64;
        self.max_feature_size = self.max_feature_size.max(record.len() as u64);
        self.pending.push(PendingFeature {
            offset: record_offset,
            len: record.len() as u64,
            rect,
        });
        Ok(())
    }

    /// Finalizes the dataset: Hilbert-sorts the buffered features,
    /// builds the index over that order (if enabled), and writes magic
    /// bytes, header, index, and feature stream to `out` (§4.6).
    pub fn close<W: Write + Seek>(mut self, mut out: W) -> Result<()> {
        let features_count = self.pending.len() as u64;
        debug!(features_count, "closing writer");

        let order = self.sorted_order();

        let mut final_items = Vec::with_capacity(order.len());
        let mut offset = 0u64;
        for &idx in &order {
            let pending = &self.pending[idx];
            final_items.push(NodeItem {
                offset,
                ..pending.rect
            });
            offset += pending.len;
        }

        let tree = if self.options.spatial_index && !final_items.is_empty() {
            Some(PackedRTree::build(
                &final_items,
                &self.extent,
                self.options.index_node_size,
            )?)
        } else {
            None
        };

        let header = Header {
            name: self.options.name.clone(),
            envelope: (features_count > 0).then_some([
                self.extent.min_x,
                self.extent.min_y,
                self.extent.max_x,
                self.extent.max_y,
            ]),
            geometry_type: self.geometry_type,
            has_z: self.has_z,
            has_m: self.has_m,
            has_t: false,
            has_tm: false,
            columns: self.columns.clone(),
            features_count,
            index_node_size: if tree.is_some() {
                self.options.index_node_size
            } else {
                0
            },
            crs: self.options.crs.clone(),
            title: self.options.title.clone(),
            description: self.options.description.clone(),
            metadata: self.options.metadata.clone(),
        };
        let header_bytes = encode_header(&header);

        out.write_all(&MAGIC_BYTES)?;
        out.write_all(&(header_bytes.len() as u32).to_le_bytes())?;
        out.write_all(&header_bytes)?;

        if let Some(tree) = &tree {
            tree.stream_write(&mut out)?;
        }

        self.copy_features(&order, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Picks between the two copy strategies of §4.6 and runs it. The
    /// original driver keys this choice on whether the temp file lives on
    /// `/vsimem/` (true RAM) or disk; this port has no such distinction
    /// available through `std`/`tempfile` (an unnamed temp file is a
    /// regular [`File`] regardless of the backing filesystem), so it infers
    /// the RAM-like case from the scratch file's total size instead: once
    /// the whole scratch file is no bigger than the streaming-memory
    /// threshold, a single feature-at-a-time seek/read/write pass costs
    /// about the same as one batched pass anyway, so there is nothing to
    /// amortize by batching. Recorded as an Open Question resolution in
    /// `DESIGN.md`.
    fn copy_features<W: Write>(&mut self, order: &[usize], out: &mut W) -> Result<()> {
        let temp_size = self.cursor;
        if temp_size <= FEATURE_SIZE_FAST_PATH {
            self.copy_features_streaming(order, out)
        } else {
            let buffer_bytes = self.max_feature_size.max(FEATURE_SIZE_FAST_PATH.min(temp_size));
            self.copy_features_batched(order, buffer_bytes, out)
        }
    }

    /// Streaming-memory copy strategy (§4.6): one feature at a time,
    /// seek-read-write, with a buffer sized to the single feature being
    /// copied rather than the whole batch.
    fn copy_features_streaming<W: Write>(&mut self, order: &[usize], out: &mut W) -> Result<()> {
        let mut buf = Vec::new();
        for &idx in order {
            let p = &self.pending[idx];
            buf.resize(p.len as usize, 0);
            self.scratch.seek(SeekFrom::Start(p.offset))?;
            self.scratch.read_exact(&mut buf)?;
            out.write_all(&buf)?;
        }
        Ok(())
    }

    /// Index permutation of `self.pending` in final on-disk order: Hilbert
    /// order when a spatial index is requested, insertion order otherwise
    /// (§4.3 "Node filling" requires leaves to already be sorted; §4.6
    /// leaves insertion order alone when no index is built).
    fn sorted_order(&self) -> Vec<usize> {
        if !self.options.spatial_index || self.pending.is_empty() {
            return (0..self.pending.len()).collect();
        }
        // Stash each feature's original index in the otherwise-unused
        // `offset` field so `hilbert_sort`'s in-place rectangle sort
        // doubles as an index permutation.
        let mut tagged: Vec<NodeItem> = self
            .pending
            .iter()
            .enumerate()
            .map(|(i, p)| NodeItem {
                offset: i as u64,
                ..p.rect
            })
            .collect();
        rtree::hilbert_sort(&mut tagged, &self.extent);
        tagged.iter().map(|n| n.offset as usize).collect()
    }

    /// Batched copy strategy (§4.6): allocates a copy buffer of
    /// `buffer_bytes` (`max(max_feature_size, min(100 MiB, temp_size))`,
    /// computed by the caller), accumulates target-side slots for a batch,
    /// then reads batch sources in ascending offset (sequential reads)
    /// before a single write of the filled portion. A single record larger
    /// than the buffer budget simply becomes its own one-record batch.
    fn copy_features_batched<W: Write>(
        &mut self,
        order: &[usize],
        buffer_bytes: u64,
        out: &mut W,
    ) -> Result<()> {
        let mut batch_start = 0usize;
        while batch_start < order.len() {
            let mut batch_end = batch_start;
            let mut batch_bytes = 0u64;
            while batch_end < order.len() {
                let len = self.pending[order[batch_end]].len;
                if batch_bytes > 0 && batch_bytes + len > buffer_bytes {
                    break;
                }
                batch_bytes += len;
                batch_end += 1;
            }

            let mut slots: Vec<(u64, u64, u64)> = Vec::with_capacity(batch_end - batch_start);
            let mut dst = 0u64;
            for &idx in &order[batch_start..batch_end] {
                let p = &self.pending[idx];
                slots.push((p.offset, dst, p.len));
                dst += p.len;
            }

            let mut read_order: Vec<usize> = (0..slots.len()).collect();
            read_order.sort_by_key(|&i| slots[i].0);

            let mut buf = vec![0u8; batch_bytes as usize];
            for i in read_order {
                let (src, dst, len) = slots[i];
                self.scratch.seek(SeekFrom::Start(src))?;
                self.scratch
                    .read_exact(&mut buf[dst as usize..(dst + len) as usize])?;
            }
            out.write_all(&buf)?;
            batch_start = batch_end;
        }
        Ok(())
    }
}

/// True when `g` carries no coordinates anywhere in its tree, directly or
/// through nested `parts` (§4.6 "empty/missing geometries are skipped").
fn is_empty_geometry(g: &Geometry) -> bool {
    g.num_points() == 0 && g.parts.iter().all(is_empty_geometry)
}

/// Bounding rectangle of every coordinate pair reachable from `g`,
/// including nested `parts` (§4.1, §4.6 "per-feature extent").
fn rect_of(g: &Geometry) -> NodeItem {
    let mut rect = NodeItem::empty();
    collect_rect(g, &mut rect);
    rect
}

fn collect_rect(g: &Geometry, rect: &mut NodeItem) {
    let mut i = 0;
    while i + 1 < g.xy.len() {
        let (x, y) = (g.xy[i], g.xy[i + 1]);
        rect.expand(&NodeItem::new(x, y, x, y));
        i += 2;
    }
    for part in &g.parts {
        collect_rect(part, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::ColumnType;
    use crate::reader::Reader;
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

    #[test]
    fn empty_dataset_roundtrips() {
        let writer = Writer::create(GeometryType::Point, Vec::new()).unwrap();
        let mut out = Cursor::new(Vec::new());
        writer.close(&mut out).unwrap();

        let mut reader = Reader::open(Cursor::new(out.into_inner())).unwrap();
        assert_eq!(reader.header().features_count, 0);
        assert!(reader.get_next_feature().unwrap().is_none());
    }

    #[test]
    fn rejects_mismatched_geometry_type() {
        let mut writer = Writer::create(GeometryType::Point, Vec::new()).unwrap();
        let line = Geometry {
            type_: GeometryType::LineString,
            xy: vec![0.0, 0.0, 1.0, 1.0],
            z: None,
            m: None,
            ends: None,
            parts: Vec::new(),
        };
        let err = writer.create_feature(Some(&line), &[]).unwrap_err();
        assert!(matches!(err, Error::GeometryTypeMismatch { .. }));
    }

    #[test]
    fn missing_or_empty_geometry_is_skipped_not_written() {
        let mut writer = Writer::create(GeometryType::Point, Vec::new()).unwrap();
        writer.create_feature(None, &[]).unwrap();
        let empty = Geometry {
            type_: GeometryType::Point,
            xy: Vec::new(),
            z: None,
            m: None,
            ends: None,
            parts: Vec::new(),
        };
        writer.create_feature(Some(&empty), &[]).unwrap();
        writer.create_feature(Some(&point(1.0, 2.0)), &[]).unwrap();

        assert_eq!(writer.num_features(), 1);
        let mut out = Cursor::new(Vec::new());
        writer.close(&mut out).unwrap();

        let mut reader = Reader::open(Cursor::new(out.into_inner())).unwrap();
        assert_eq!(reader.header().features_count, 1);
        let feature = reader.get_next_feature().unwrap().unwrap();
        assert_eq!(feature.geometry, Some(point(1.0, 2.0)));
        assert!(reader.get_next_feature().unwrap().is_none());
    }

    #[test]
    fn batched_copy_with_small_buffer_preserves_every_record() {
        let mut writer = Writer::create(GeometryType::Point, Vec::new()).unwrap();
        for i in 0..20 {
            writer
                .create_feature(Some(&point(i as f64, i as f64)), &[])
                .unwrap();
        }
        let order: Vec<usize> = (0..writer.pending.len()).collect();
        let expected_len: u64 = writer.pending.iter().map(|p| p.len).sum();

        let mut out = Cursor::new(Vec::new());
        // A buffer far smaller than the dataset forces many batches,
        // exercising the "record larger than nothing left in batch" split.
        writer.copy_features_batched(&order, 64, &mut out).unwrap();
        assert_eq!(out.into_inner().len() as u64, expected_len);
    }

    #[test]
    fn copy_buffer_size_grows_with_max_feature_size() {
        let columns = vec![Column::new("note", ColumnType::String)];
        let mut writer = Writer::create(GeometryType::Point, columns).unwrap();
        writer.create_feature(Some(&point(0.0, 0.0)), &[]).unwrap();
        writer
            .create_feature(
                Some(&point(1.0, 1.0)),
                &[(0, PropertyValue::String("x".repeat(500)))],
            )
            .unwrap();
        assert!(writer.max_feature_size > 500);
    }

    #[test]
    fn hilbert_order_is_permutation_not_insertion_order() {
        let columns = vec![Column::new("id", ColumnType::Int)];
        let mut writer = Writer::create(GeometryType::Point, columns).unwrap();
        let pts = [(0.0, 0.0), (9.0, 9.0), (9.0, 0.0), (0.0, 9.0)];
        for (i, &(x, y)) in pts.iter().enumerate() {
            writer
                .create_feature(Some(&point(x, y)), &[(0, PropertyValue::Int(i as i32))])
                .unwrap();
        }
        let mut out = Cursor::new(Vec::new());
        writer.close(&mut out).unwrap();

        let mut reader = Reader::open(Cursor::new(out.into_inner())).unwrap();
        let mut seen_ids = Vec::new();
        while let Some(f) = reader.get_next_feature().unwrap() {
            if let Some((_, PropertyValue::Int(id))) = f.properties.first() {
                seen_ids.push(*id);
            }
        }
        seen_ids.sort();
        assert_eq!(seen_ids, vec![0, 1, 2, 3]);
    }
}
