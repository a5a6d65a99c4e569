//! Read and write FlatGeobuf: a binary geospatial vector format built
//! from a FlatBuffers header, an optional packed Hilbert R-tree spatial
//! index, and a length-prefixed stream of FlatBuffers feature records.
//!
//! The three entry points are [`Reader`], [`Writer`], and
//! [`EditableDataset`]; [`Header`], [`Geometry`], and [`Column`] /
//! [`PropertyValue`] describe the data model shared by all three.

pub mod consts;
pub mod editable;
pub mod error;
pub mod fb;
pub mod geometry;
pub mod header;
pub mod properties;
pub mod reader;
pub mod rtree;
pub mod writer;

pub use consts::{MAGIC_BYTES, VERSION};
pub use editable::EditableDataset;
pub use error::{DecodeError, Error, Result};
pub use geometry::{Geometry, GeometryType};
pub use header::{Crs, Header};
pub use properties::{Column, ColumnType, PropertyValue};
pub use reader::{AttributeFilter, Feature, Reader, ReaderOptions};
pub use rtree::{NodeItem, PackedRTree, SearchResultItem};
pub use writer::{Writer, WriterOptions};

/// Checks the first eight bytes of a source against the magic sequence
/// without requiring an exact version match, so a caller can distinguish
/// "not a FlatGeobuf file" from "an unsupported but recognizable
/// version" before calling [`Reader::open`].
pub fn check_magic_bytes(bytes: &[u8]) -> bool {
    bytes.len() >= consts::MAGIC_BYTES_SIZE
        && bytes[0..3] == MAGIC_BYTES[0..3]
        && bytes[4..8] == MAGIC_BYTES[4..8]
}
