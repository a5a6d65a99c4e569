//! C7: the editable wrapper (§4.7) — logical update/delete of features
//! and add/drop of schema columns over an on-disk dataset that is
//! otherwise immutable, realized as a full rewrite swapped in
//! atomically on [`EditableDataset::sync`].

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::header::Header;
use crate::properties::{Column, PropertyValue};
use crate::reader::{AttributeFilter, Feature, Reader};
use crate::rtree::{NodeItem, PackedRTree};
use crate::writer::{Writer, WriterOptions};

enum Edit {
    Update(u64, Option<Geometry>, Vec<(u16, PropertyValue)>),
    Delete(u64),
}

/// A dataset opened for logical editing. Edits queue in memory;
/// [`EditableDataset::sync`] is the only operation that touches disk,
/// and it does so by writing a sibling file and renaming it into place
/// (§4.7). Reads (sequential, spatial, attribute-filtered) pass straight
/// through to an inner [`Reader`], the same one `sync` itself scans with
/// its filters stripped, so the wrapper behaves like the read-only
/// container it decorates outside of a `sync` call.
pub struct EditableDataset {
    path: PathBuf,
    header: Header,
    reader: Reader<File>,
    edits: Vec<Edit>,
    added_columns: Vec<Column>,
    dropped_columns: Vec<String>,
}

impl EditableDataset {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        let reader = Reader::open(file)?;
        let header = reader.header().clone();
        Ok(EditableDataset {
            path,
            header,
            reader,
            edits: Vec::new(),
            added_columns: Vec::new(),
            dropped_columns: Vec::new(),
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Restores the scan position to the start of the feature stream.
    pub fn reset_reading(&mut self) {
        self.reader.reset_reading();
    }

    /// Installs (or clears) a spatial predicate on the inner reader.
    pub fn set_spatial_filter(&mut self, rect: Option<NodeItem>) {
        self.reader.set_spatial_filter(rect);
    }

    /// Installs (or clears) an attribute predicate on the inner reader.
    pub fn set_attribute_filter(&mut self, filter: Option<AttributeFilter>) {
        self.reader.set_attribute_filter(filter);
    }

    /// Reads through to the inner reader, honoring whatever filters are
    /// currently installed — queued edits are not reflected until
    /// [`EditableDataset::sync`] has run.
    pub fn get_next_feature(&mut self) -> Result<Option<Feature>> {
        self.reader.get_next_feature()
    }

    /// Queues a replacement of feature `fid`'s geometry and properties.
    /// `properties` is indexed against the schema as it stands now, i.e.
    /// before any queued [`EditableDataset::add_field`]/`drop_field`
    /// takes effect at [`EditableDataset::sync`].
    pub fn update_feature(
        &mut self,
        fid: u64,
        geometry: Option<Geometry>,
        properties: Vec<(u16, PropertyValue)>,
    ) -> Result<()> {
        if fid >= self.header.features_count {
            return Err(Error::NotFound(fid));
        }
        self.edits.push(Edit::Update(fid, geometry, properties));
        Ok(())
    }

    pub fn delete_feature(&mut self, fid: u64) -> Result<()> {
        if fid >= self.header.features_count {
            return Err(Error::NotFound(fid));
        }
        self.edits.push(Edit::Delete(fid));
        Ok(())
    }

    /// Queues a new schema column, appended after the existing ones.
    /// Rejected once a feature edit is already queued, since that edit's
    /// property indices were taken against the pre-change schema (§4.7
    /// "schema changes do not interleave with feature edits").
    pub fn add_field(&mut self, column: Column) -> Result<()> {
        if !self.edits.is_empty() {
            return Err(Error::SchemaLocked);
        }
        if self.header.columns.iter().any(|c| c.name == column.name)
            || self.added_columns.iter().any(|c| c.name == column.name)
        {
            return Err(Error::CorruptData(format!(
                "column '{}' already exists",
                column.name
            )));
        }
        self.added_columns.push(column);
        Ok(())
    }

    /// Queues removal of an existing schema column by name.
    pub fn drop_field(&mut self, name: &str) -> Result<()> {
        if !self.edits.is_empty() {
            return Err(Error::SchemaLocked);
        }
        if !self.header.columns.iter().any(|c| c.name == name) {
            return Err(Error::CorruptData(format!("no such column '{name}'")));
        }
        if !self.dropped_columns.iter().any(|n| n == name) {
            self.dropped_columns.push(name.to_string());
        }
        Ok(())
    }

    /// Applies every queued edit in one rewrite pass: reads the current
    /// file feature by feature, substitutes or skips edited features,
    /// remaps property indices onto the new schema, writes the result to
    /// a sibling `.new` file, then swaps it in via `old -> .bak`,
    /// `.new -> old`, unlink `.bak` (§4.7). A no-op if nothing is queued.
    pub fn sync(&mut self) -> Result<()> {
        if self.edits.is_empty() && self.added_columns.is_empty() && self.dropped_columns.is_empty()
        {
            return Ok(());
        }
        trace!(path = %self.path.display(), "syncing editable dataset");

        let mut pending: HashMap<u64, Option<(Option<Geometry>, Vec<(u16, PropertyValue)>)>> =
            HashMap::new();
        for edit in &self.edits {
            match edit {
                Edit::Update(fid, geometry, properties) => {
                    pending.insert(*fid, Some((geometry.clone(), properties.clone())));
                }
                Edit::Delete(fid) => {
                    pending.insert(*fid, None);
                }
            }
        }

        let new_columns = self.rebuild_columns();
        let remap = self.column_remap(&new_columns);

        // Strip whatever filters the caller had installed so the rewrite
        // pass sees every feature (§4.7); restored after the swap below.
        let saved_filters = self.reader.take_filters();
        self.reader.reset_reading();

        let mut writer = Writer::create_with_options(
            self.header.geometry_type,
            new_columns,
            WriterOptions {
                spatial_index: self.header.index_node_size > 0,
                index_node_size: if self.header.index_node_size > 0 {
                    self.header.index_node_size
                } else {
                    PackedRTree::DEFAULT_NODE_SIZE
                },
                has_z: self.header.has_z,
                has_m: self.header.has_m,
                name: self.header.name.clone(),
                title: self.header.title.clone(),
                description: self.header.description.clone(),
                metadata: self.header.metadata.clone(),
                crs: self.header.crs.clone(),
            },
        )?;

        let mut fid = 0u64;
        while let Some(feature) = self.reader.get_next_feature()? {
            match pending.remove(&fid) {
                Some(Some((geometry, properties))) => {
                    let remapped = remap_properties(&properties, &remap);
                    writer.create_feature(geometry.as_ref(), &remapped)?;
                }
                Some(None) => {
                    debug!(fid, "feature dropped by editable sync");
                }
                None => {
                    let remapped = remap_properties(&feature.properties, &remap);
                    writer.create_feature(feature.geometry.as_ref(), &remapped)?;
                }
            }
            fid += 1;
        }

        let new_path = sibling_path(&self.path, "new");
        let bak_path = sibling_path(&self.path, "bak");
        let out = File::create(&new_path)?;
        writer.close(out)?;

        fs::rename(&self.path, &bak_path)?;
        fs::rename(&new_path, &self.path)?;
        fs::remove_file(&bak_path)?;
        debug!(path = %self.path.display(), "rewrite-on-sync complete");

        let file = File::open(&self.path)?;
        self.reader = Reader::open(file)?;
        self.header = self.reader.header().clone();
        self.reader.restore_filters_after_rewrite(saved_filters);
        self.edits.clear();
        self.added_columns.clear();
        self.dropped_columns.clear();
        Ok(())
    }

    fn rebuild_columns(&self) -> Vec<Column> {
        let mut columns: Vec<Column> = self
            .header
            .columns
            .iter()
            .filter(|c| !self.dropped_columns.iter().any(|n| n == &c.name))
            .cloned()
            .collect();
        columns.extend(self.added_columns.iter().cloned());
        columns
    }

    /// `remap[old_index]` is the column's position in the rebuilt schema,
    /// or `None` if that column was dropped.
    fn column_remap(&self, new_columns: &[Column]) -> Vec<Option<u16>> {
        self.header
            .columns
            .iter()
            .map(|c| {
                new_columns
                    .iter()
                    .position(|nc| nc.name == c.name)
                    .map(|i| i as u16)
            })
            .collect()
    }
}

fn remap_properties(
    properties: &[(u16, PropertyValue)],
    remap: &[Option<u16>],
) -> Vec<(u16, PropertyValue)> {
    properties
        .iter()
        .filter_map(|(idx, value)| {
            remap
                .get(*idx as usize)
                .copied()
                .flatten()
                .map(|new_idx| (new_idx, value.clone()))
        })
        .collect()
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
