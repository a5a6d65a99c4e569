//! C2: the property codec (§4.2) plus the in-memory column schema types
//! shared with the header codec.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Scalar type of one schema column (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColumnType {
    Byte = 0,
    UByte = 1,
    Bool = 2,
    Short = 3,
    UShort = 4,
    Int = 5,
    UInt = 6,
    Long = 7,
    ULong = 8,
    Float = 9,
    Double = 10,
    String = 11,
    Json = 12,
    DateTime = 13,
    Binary = 14,
}

impl ColumnType {
    pub fn from_u8(v: u8) -> Result<Self> {
        Ok(match v {
            0 => Self::Byte,
            1 => Self::UByte,
            2 => Self::Bool,
            3 => Self::Short,
            4 => Self::UShort,
            5 => Self::Int,
            6 => Self::UInt,
            7 => Self::Long,
            8 => Self::ULong,
            9 => Self::Float,
            10 => Self::Double,
            11 => Self::String,
            12 => Self::Json,
            13 => Self::DateTime,
            14 => Self::Binary,
            other => return Err(Error::CorruptData(format!("unknown column type {other}"))),
        })
    }
}

/// A schema field (§3). `-1` in `width`/`precision`/`scale` means
/// unspecified, matching the on-disk default.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub type_: ColumnType,
    pub title: Option<String>,
    pub description: Option<String>,
    pub width: i64,
    pub precision: i64,
    pub scale: i64,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, type_: ColumnType) -> Self {
        Column {
            name: name.into(),
            type_,
            title: None,
            description: None,
            width: -1,
            precision: -1,
            scale: -1,
            nullable: true,
            unique: false,
            primary_key: false,
        }
    }
}

/// One decoded/encodable property value, tagged by the column's declared
/// [`ColumnType`] rather than carrying its own type byte on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Byte(i8),
    UByte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    String(String),
    Json(String),
    DateTime(String),
    Binary(Vec<u8>),
}

impl PropertyValue {
    fn type_matches(&self, t: ColumnType) -> bool {
        matches!(
            (self, t),
            (PropertyValue::Bool(_), ColumnType::Bool)
                | (PropertyValue::Byte(_), ColumnType::Byte)
                | (PropertyValue::UByte(_), ColumnType::UByte)
                | (PropertyValue::Short(_), ColumnType::Short)
                | (PropertyValue::UShort(_), ColumnType::UShort)
                | (PropertyValue::Int(_), ColumnType::Int)
                | (PropertyValue::UInt(_), ColumnType::UInt)
                | (PropertyValue::Long(_), ColumnType::Long)
                | (PropertyValue::ULong(_), ColumnType::ULong)
                | (PropertyValue::Float(_), ColumnType::Float)
                | (PropertyValue::Double(_), ColumnType::Double)
                | (PropertyValue::String(_), ColumnType::String)
                | (PropertyValue::Json(_), ColumnType::Json)
                | (PropertyValue::DateTime(_), ColumnType::DateTime)
                | (PropertyValue::Binary(_), ColumnType::Binary)
        )
    }
}

/// Longest byte length accepted for a `DateTime` field's ASCII payload (§4.2).
const DATETIME_MAX_LEN: usize = 32;

/// Packs `(column_index, value)` pairs into the little-endian property
/// blob described in §4.2. Unset columns are simply absent from `values`.
pub fn encode_properties(columns: &[Column], values: &[(u16, PropertyValue)]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for (col_index, value) in values {
        let idx = *col_index as usize;
        let column = columns.get(idx).ok_or_else(|| {
            Error::CorruptData(format!("property column index {idx} out of range"))
        })?;
        if !value.type_matches(column.type_) {
            return Err(Error::CorruptData(format!(
                "value for column '{}' does not match its declared type",
                column.name
            )));
        }
        buf.write_u16::<LittleEndian>(*col_index)?;
        match value {
            PropertyValue::Bool(v) => buf.write_u8(*v as u8)?,
            PropertyValue::Byte(v) => buf.write_i8(*v)?,
            PropertyValue::UByte(v) => buf.write_u8(*v)?,
            PropertyValue::Short(v) => buf.write_i16::<LittleEndian>(*v)?,
            PropertyValue::UShort(v) => buf.write_u16::<LittleEndian>(*v)?,
            PropertyValue::Int(v) => buf.write_i32::<LittleEndian>(*v)?,
            PropertyValue::UInt(v) => buf.write_u32::<LittleEndian>(*v)?,
            PropertyValue::Long(v) => buf.write_i64::<LittleEndian>(*v)?,
            PropertyValue::ULong(v) => buf.write_u64::<LittleEndian>(*v)?,
            PropertyValue::Float(v) => buf.write_f32::<LittleEndian>(*v)?,
            PropertyValue::Double(v) => buf.write_f64::<LittleEndian>(*v)?,
            PropertyValue::String(v) | PropertyValue::Json(v) => {
                write_length_prefixed(&mut buf, v.as_bytes())?;
            }
            PropertyValue::DateTime(v) => {
                check_datetime(v)?;
                write_length_prefixed(&mut buf, v.as_bytes())?;
            }
            PropertyValue::Binary(v) => write_length_prefixed(&mut buf, v)?,
        }
    }
    Ok(buf)
}

/// Validates a `DateTime` value against the §4.2 wire constraints: an
/// ISO-8601 date, time, or date-time string no longer than
/// [`DATETIME_MAX_LEN`] bytes. This column type backs `OFTDate`,
/// `OFTTime`, and `OFTDateTime` alike (the original driver maps all three
/// to it), so a bare date or bare time is accepted alongside a full
/// offset-qualified timestamp rather than only the latter.
fn check_datetime(s: &str) -> Result<()> {
    if s.len() > DATETIME_MAX_LEN {
        return Err(Error::InvalidSize(format!(
            "DateTime value of {} bytes exceeds the {DATETIME_MAX_LEN} byte cap",
            s.len()
        )));
    }
    let valid = ChronoDateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok();
    if !valid {
        return Err(Error::CorruptData(format!("invalid DateTime value '{s}'")));
    }
    Ok(())
}

fn write_length_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
    buf.write_u32::<LittleEndian>(bytes.len() as u32)?;
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Unpacks a property blob into `(column_index, value)` pairs (§4.2).
/// Rejects truncated records and a column index set more than once.
pub fn decode_properties(buf: &[u8], columns: &[Column]) -> Result<Vec<(u16, PropertyValue)>> {
    let mut cursor = Cursor::new(buf);
    let mut out = Vec::new();
    let mut seen = vec![false; columns.len()];

    while (cursor.position() as usize) < buf.len() {
        let remaining = buf.len() - cursor.position() as usize;
        if remaining < 2 {
            return Err(Error::CorruptData(
                "property blob truncated before a column index".into(),
            ));
        }
        let col_index = cursor.read_u16::<LittleEndian>()?;
        let column = columns.get(col_index as usize).ok_or_else(|| {
            Error::CorruptData(format!("property column index {col_index} out of range"))
        })?;
        if std::mem::replace(&mut seen[col_index as usize], true) {
            return Err(Error::CorruptData(format!(
                "column '{}' set more than once in the same feature",
                column.name
            )));
        }

        let value = read_value(&mut cursor, column.type_, buf.len())?;
        out.push((col_index, value));
    }
    Ok(out)
}

fn read_value(
    cursor: &mut Cursor<&[u8]>,
    type_: ColumnType,
    buf_len: usize,
) -> Result<PropertyValue> {
    let pos = cursor.position() as usize;
    let need = |n: usize| -> Result<()> {
        if pos + n > buf_len {
            return Err(Error::CorruptData(format!(
                "property value at offset {pos} needs {n} bytes but only {} remain",
                buf_len - pos
            )));
        }
        Ok(())
    };
    Ok(match type_ {
        ColumnType::Bool => {
            need(1)?;
            PropertyValue::Bool(cursor.read_u8()? != 0)
        }
        ColumnType::Byte => {
            need(1)?;
            PropertyValue::Byte(cursor.read_i8()?)
        }
        ColumnType::UByte => {
            need(1)?;
            PropertyValue::UByte(cursor.read_u8()?)
        }
        ColumnType::Short => {
            need(2)?;
            PropertyValue::Short(cursor.read_i16::<LittleEndian>()?)
        }
        ColumnType::UShort => {
            need(2)?;
            PropertyValue::UShort(cursor.read_u16::<LittleEndian>()?)
        }
        ColumnType::Int => {
            need(4)?;
            PropertyValue::Int(cursor.read_i32::<LittleEndian>()?)
        }
        ColumnType::UInt => {
            need(4)?;
            PropertyValue::UInt(cursor.read_u32::<LittleEndian>()?)
        }
        ColumnType::Long => {
            need(8)?;
            PropertyValue::Long(cursor.read_i64::<LittleEndian>()?)
        }
        ColumnType::ULong => {
            need(8)?;
            PropertyValue::ULong(cursor.read_u64::<LittleEndian>()?)
        }
        ColumnType::Float => {
            need(4)?;
            PropertyValue::Float(cursor.read_f32::<LittleEndian>()?)
        }
        ColumnType::Double => {
            need(8)?;
            PropertyValue::Double(cursor.read_f64::<LittleEndian>()?)
        }
        ColumnType::String => PropertyValue::String(read_length_prefixed_string(cursor, buf_len)?),
        ColumnType::Json => PropertyValue::Json(read_length_prefixed_string(cursor, buf_len)?),
        ColumnType::DateTime => {
            let s = read_length_prefixed_string(cursor, buf_len)?;
            check_datetime(&s)?;
            PropertyValue::DateTime(s)
        }
        ColumnType::Binary => {
            let len = read_length_prefix(cursor, buf_len)?;
            let mut bytes = vec![0u8; len];
            std::io::Read::read_exact(cursor, &mut bytes)?;
            PropertyValue::Binary(bytes)
        }
    })
}

fn read_length_prefix(cursor: &mut Cursor<&[u8]>, buf_len: usize) -> Result<usize> {
    let pos = cursor.position() as usize;
    if pos + 4 > buf_len {
        return Err(Error::CorruptData(format!(
            "length prefix at offset {pos} does not fit in the remaining buffer"
        )));
    }
    let len = cursor.read_u32::<LittleEndian>()? as usize;
    let pos_after = cursor.position() as usize;
    if pos_after + len > buf_len {
        return Err(Error::CorruptData(format!(
            "declared length {len} at offset {pos_after} exceeds the buffer"
        )));
    }
    Ok(len)
}

fn read_length_prefixed_string(cursor: &mut Cursor<&[u8]>, buf_len: usize) -> Result<String> {
    let len = read_length_prefix(cursor, buf_len)?;
    let mut bytes = vec![0u8; len];
    std::io::Read::read_exact(cursor, &mut bytes)?;
    String::from_utf8(bytes).map_err(|e| Error::CorruptData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<Column> {
        vec![
            Column::new("name", ColumnType::String),
            Column::new("count", ColumnType::Int),
            Column::new("active", ColumnType::Bool),
        ]
    }

    #[test]
    fn roundtrip_skips_unset_columns() {
        let columns = schema();
        let values = vec![
            (0u16, PropertyValue::String("Alice".into())),
            (2u16, PropertyValue::Bool(true)),
        ];
        let blob = encode_properties(&columns, &values).unwrap();
        let decoded = decode_properties(&blob, &columns).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn bare_date_and_bare_time_are_valid_datetime_payloads() {
        let columns = vec![Column::new("ts", ColumnType::DateTime)];
        for value in ["2024-01-02", "03:04:05", "2024-01-02T03:04:05"] {
            encode_properties(&columns, &[(0, PropertyValue::DateTime(value.into()))]).unwrap();
        }
    }

    #[test]
    fn duplicate_column_index_is_corrupt_data() {
        let columns = schema();
        let mut blob = encode_properties(&columns, &[(1, PropertyValue::Int(1))]).unwrap();
        blob.extend(encode_properties(&columns, &[(1, PropertyValue::Int(2))]).unwrap());
        let err = decode_properties(&blob, &columns).unwrap_err();
        assert!(matches!(err, Error::CorruptData(_)));
    }

    #[test]
    fn truncated_length_prefixed_value_is_rejected() {
        let columns = schema();
        let mut blob = encode_properties(&columns, &[(0, PropertyValue::String("hi".into()))]).unwrap();
        blob.truncate(blob.len() - 1);
        let err = decode_properties(&blob, &columns).unwrap_err();
        assert!(matches!(err, Error::CorruptData(_)));
    }
}
