//! C4: the header codec (§4.4) — the schema, geometry flags, CRS
//! descriptor, and index node size shared by every feature in the file.

use flatbuffers::FlatBufferBuilder;

use crate::consts::HEADER_MAX_BUFFER_SIZE;
use crate::error::{Error, Result};
use crate::fb::header_generated::{self, ColumnArgs, CrsArgs, HeaderArgs};
use crate::geometry::GeometryType;
use crate::properties::{Column, ColumnType};

/// Coordinate reference system descriptor (§3, §4.4). `org`+`code` (e.g.
/// `EPSG:4326`) is the preferred, compact form; `wkt` is the fallback for
/// anything the two-field form cannot express.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Crs {
    pub org: Option<String>,
    pub code: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub wkt: Option<String>,
}

/// The dataset header (§3): schema, geometry flags, CRS, extent and
/// feature count. Constructed once at write start, finalized at the
/// first feature, emitted verbatim at close; parsed once at
/// [`crate::Reader::open`].
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub name: Option<String>,
    pub envelope: Option<[f64; 4]>,
    pub geometry_type: GeometryType,
    pub has_z: bool,
    pub has_m: bool,
    pub has_t: bool,
    pub has_tm: bool,
    pub columns: Vec<Column>,
    pub features_count: u64,
    /// `0` means no spatial index (§3).
    pub index_node_size: u16,
    pub crs: Option<Crs>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            name: None,
            envelope: None,
            geometry_type: GeometryType::Unknown,
            has_z: false,
            has_m: false,
            has_t: false,
            has_tm: false,
            columns: Vec::new(),
            features_count: 0,
            index_node_size: 0,
            crs: None,
            title: None,
            description: None,
            metadata: None,
        }
    }
}

/// Encodes a [`Header`] into its FlatBuffer table bytes, unprefixed — the
/// caller (the writer) prepends the `u32 LE` length described in §6.
pub fn encode_header(header: &Header) -> Vec<u8> {
    let mut fbb = FlatBufferBuilder::new();

    let name = header.name.as_deref().map(|s| fbb.create_string(s));
    let envelope = header.envelope.map(|e| fbb.create_vector(&e));
    let columns = if header.columns.is_empty() {
        None
    } else {
        let offsets: Vec<_> = header
            .columns
            .iter()
            .map(|c| encode_column(&mut fbb, c))
            .collect();
        Some(fbb.create_vector(&offsets))
    };
    let crs = header.crs.as_ref().map(|c| encode_crs(&mut fbb, c));
    let title = header.title.as_deref().map(|s| fbb.create_string(s));
    let description = header.description.as_deref().map(|s| fbb.create_string(s));
    let metadata = header.metadata.as_deref().map(|s| fbb.create_string(s));

    let args = HeaderArgs {
        name,
        envelope,
        geometry_type: header.geometry_type as u8,
        has_z: header.has_z,
        has_m: header.has_m,
        has_t: header.has_t,
        has_tm: header.has_tm,
        columns,
        features_count: header.features_count,
        index_node_size: header.index_node_size,
        crs,
        title,
        description,
        metadata,
    };
    let off = header_generated::Header::create(&mut fbb, &args);
    fbb.finish_minimal(off);
    fbb.finished_data().to_vec()
}

fn encode_crs<'a>(
    fbb: &mut FlatBufferBuilder<'a>,
    crs: &Crs,
) -> flatbuffers::WIPOffset<header_generated::Crs<'a>> {
    let org = crs.org.as_deref().map(|s| fbb.create_string(s));
    let name = crs.name.as_deref().map(|s| fbb.create_string(s));
    let description = crs.description.as_deref().map(|s| fbb.create_string(s));
    let wkt = crs.wkt.as_deref().map(|s| fbb.create_string(s));
    header_generated::Crs::create(
        fbb,
        &CrsArgs {
            org,
            code: crs.code,
            name,
            description,
            wkt,
        },
    )
}

fn encode_column<'a>(
    fbb: &mut FlatBufferBuilder<'a>,
    column: &Column,
) -> flatbuffers::WIPOffset<header_generated::Column<'a>> {
    let name = fbb.create_string(&column.name);
    let title = column.title.as_deref().map(|s| fbb.create_string(s));
    let description = column.description.as_deref().map(|s| fbb.create_string(s));
    header_generated::Column::create(
        fbb,
        &ColumnArgs {
            name,
            type_: column.type_ as u8,
            title,
            description,
            width: column.width as i32,
            precision: column.precision as i32,
            scale: column.scale as i32,
            nullable: column.nullable,
            unique_: column.unique,
            primary_key: column.primary_key,
        },
    )
}

/// Decodes a length-delimited header buffer (the bytes following the
/// `u32 LE` size prefix, §4.4). `verify` gates the optional internal
/// offset verification (§6 `verify_buffers`, default on).
pub fn decode_header(buf: &[u8], verify: bool) -> Result<Header> {
    if buf.len() > HEADER_MAX_BUFFER_SIZE {
        return Err(Error::InvalidSize(format!(
            "header of {} bytes exceeds the {HEADER_MAX_BUFFER_SIZE} byte cap",
            buf.len()
        )));
    }
    let table = if verify {
        flatbuffers::root::<header_generated::Header>(buf)?
    } else {
        unsafe { flatbuffers::root_unchecked::<header_generated::Header>(buf) }
    };
    decode_header_table(table)
}

fn decode_header_table(h: header_generated::Header<'_>) -> Result<Header> {
    let envelope = h.envelope().and_then(|e| {
        if e.len() == 4 {
            Some([e.get(0), e.get(1), e.get(2), e.get(3)])
        } else {
            None
        }
    });
    let columns = h
        .columns()
        .map(|cols| {
            (0..cols.len())
                .map(|i| decode_column(cols.get(i)))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(Header {
        name: h.name().map(str::to_string),
        envelope,
        geometry_type: GeometryType::from_u8(h.geometry_type())?,
        has_z: h.has_z(),
        has_m: h.has_m(),
        has_t: h.has_t(),
        has_tm: h.has_tm(),
        columns,
        features_count: h.features_count(),
        index_node_size: h.index_node_size(),
        crs: h.crs().map(decode_crs),
        title: h.title().map(str::to_string),
        description: h.description().map(str::to_string),
        metadata: h.metadata().map(str::to_string),
    })
}

fn decode_crs(c: header_generated::Crs<'_>) -> Crs {
    Crs {
        org: c.org().map(str::to_string),
        code: c.code(),
        name: c.name().map(str::to_string),
        description: c.description().map(str::to_string),
        wkt: c.wkt().map(str::to_string),
    }
}

/// Shared with the feature parser (§3 "columns override the header
/// schema"): a feature's own column list wire-decodes through the same
/// `Column` table as the header's.
pub(crate) fn decode_column(c: header_generated::Column<'_>) -> Result<Column> {
    Ok(Column {
        name: c.name().to_string(),
        type_: ColumnType::from_u8(c.type_())?,
        title: c.title().map(str::to_string),
        description: c.description().map(str::to_string),
        width: c.width() as i64,
        precision: c.precision() as i64,
        scale: c.scale() as i64,
        nullable: c.nullable(),
        unique: c.unique_(),
        primary_key: c.primary_key(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_header() -> Header {
        Header {
            name: Some("layer".into()),
            envelope: Some([1.0, 2.0, 1.0, 2.0]),
            geometry_type: GeometryType::Point,
            has_z: false,
            has_m: false,
            has_t: false,
            has_tm: false,
            columns: vec![Column::new("name", ColumnType::String)],
            features_count: 1,
            index_node_size: 16,
            crs: Some(Crs {
                org: Some("EPSG".into()),
                code: 4326,
                name: None,
                description: None,
                wkt: None,
            }),
            title: None,
            description: None,
            metadata: None,
        }
    }

    #[test]
    fn header_roundtrip() {
        let header = schema_header();
        let encoded = encode_header(&header);
        let decoded = decode_header(&encoded, true).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn header_roundtrip_without_verification() {
        let header = schema_header();
        let encoded = encode_header(&header);
        let decoded = decode_header(&encoded, false).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn oversized_header_is_rejected() {
        let oversized = vec![0u8; HEADER_MAX_BUFFER_SIZE + 1];
        let err = decode_header(&oversized, true).unwrap_err();
        assert!(matches!(err, Error::InvalidSize(_)));
    }
}
