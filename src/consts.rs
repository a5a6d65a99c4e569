//! On-disk format constants shared by the reader and writer.

/// Current FlatGeobuf version byte (offset 3 of the magic sequence).
pub const VERSION: u8 = 3;

/// 8-byte magic sequence every FlatGeobuf file begins with.
pub const MAGIC_BYTES: [u8; 8] = [0x66, 0x67, 0x62, VERSION, 0x66, 0x67, 0x62, 0x01];

/// Size in bytes of the magic sequence.
pub const MAGIC_BYTES_SIZE: usize = 8;

/// Size in bytes of the `u32` header-size prefix that follows the magic bytes.
pub const HEADER_SIZE_PREFIX_SIZE: usize = 4;

/// Largest header FlatBuffer the reader will accept (§4.4).
pub const HEADER_MAX_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Largest single feature FlatBuffer accepted on disk (§6): `2^31 - 1`.
pub const FEATURE_MAX_BUFFER_SIZE: u64 = (1u64 << 31) - 1;

/// Above this feature size the reader applies the stricter of the two
/// size checks described in §4.5 and §9 open question (b). The threshold
/// itself is a heuristic inherited unchanged from the original driver.
pub const FEATURE_SIZE_FAST_PATH: u64 = 100 * 1024 * 1024;

/// Initial capacity of the reusable feature buffer (§4.5).
pub const FEATURE_BUF_INITIAL_CAPACITY: usize = 32 * 1024;

/// Hard ceiling on `features_count` (§6).
pub const FEATURES_COUNT_MAX: u64 = 100_000_000_000;

/// Hard ceiling on the number of items a packed R-tree may index (§4.3).
pub const RTREE_MAX_ITEMS: u64 = 1 << 56;

/// Byte size of one serialized `NodeItem` (4 × f64 + 1 × u64).
pub const NODE_ITEM_LEN: usize = 40;
