use thiserror::Error;

use crate::geometry::GeometryType;

/// The main error type for this crate's read/write operations.
///
/// Mirrors the error kinds enumerated in the format's design doc: file
/// format errors first, then I/O, then validation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing or malformed magic bytes")]
    NotAFile,

    #[error("unsupported flatgeobuf version byte {0:#x}")]
    UnsupportedVersion(u8),

    #[error("invalid size: {0}")]
    InvalidSize(String),

    #[error("corrupt data: {0}")]
    CorruptData(String),

    #[error("schema is locked: a feature has already been written")]
    SchemaLocked,

    #[error("feature geometry type {actual:?} does not match declared layer type {expected:?}")]
    GeometryTypeMismatch {
        expected: GeometryType,
        actual: GeometryType,
    },

    #[error("feature {0} not found")]
    NotFound(u64),

    #[error("spatial index is required for this operation but the file has none")]
    NoIndex,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid flatbuffer: {0}")]
    InvalidFlatbuffer(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("r-tree error: {0}")]
    Rtree(#[from] crate::rtree::Error),
}

impl Error {
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::NotAFile
                | Error::UnsupportedVersion(_)
                | Error::InvalidFlatbuffer(_)
                | Error::InvalidSize(_)
        )
    }
}

impl From<flatbuffers::InvalidFlatbuffer> for Error {
    fn from(e: flatbuffers::InvalidFlatbuffer) -> Self {
        Error::InvalidFlatbuffer(e.to_string())
    }
}

/// Errors raised by the geometry codec specifically (§4.1). Kept distinct
/// from [`Error`] so decode call sites can match on the precise failure
/// before it is wrapped into the crate-wide error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("array {name} has length {actual}, expected {expected}")]
    WrongDimensionalityArray {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("offset {offset} + length {length} exceeds array size {size}")]
    OffsetOutOfRange {
        offset: usize,
        length: usize,
        size: usize,
    },

    #[error("unsupported geometry type tag {0}")]
    UnsupportedType(u8),

    #[error("size overflow while computing a buffer length")]
    SizeOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
