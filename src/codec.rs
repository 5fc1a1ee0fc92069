//! Primitive wire codec: compact-size varints and fixed-width little-endian integers
//!
//! VarInt (compact size) encoding:
//! - 0x00-0xfc: value is the number itself (1 byte)
//! - 0xfd: followed by 2 bytes (little-endian) for values 0xfd-0xffff
//! - 0xfe: followed by 4 bytes (little-endian) for values 0x10000-0xffffffff
//! - 0xff: followed by 8 bytes (little-endian) for larger values
//!
//! Only the shortest form of a value is accepted.

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Domain, ErrorKind, Result};

/// Types with a canonical byte encoding
pub trait Encodable {
    /// Appends the canonical encoding to `out`
    fn encode_to(&self, out: &mut Vec<u8>);

    /// Exact number of bytes `encode_to` appends
    fn encoded_len(&self) -> usize;

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut out);
        out
    }
}

/// Types decodable from their canonical byte encoding
pub trait Decodable: Sized {
    /// Decodes one value, leaving the cursor just past it
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self>;

    /// Decodes a value that must span the whole of `bytes`
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);
        let value = Self::decode(&mut cursor)?;
        cursor.finish()?;
        Ok(value)
    }
}

pub fn read_u8(cursor: &mut ByteCursor<'_>) -> Result<u8> {
    Ok(cursor.read_array::<1>()?[0])
}

pub fn read_u16_le(cursor: &mut ByteCursor<'_>) -> Result<u16> {
    Ok(u16::from_le_bytes(cursor.read_array()?))
}

pub fn read_u32_le(cursor: &mut ByteCursor<'_>) -> Result<u32> {
    Ok(u32::from_le_bytes(cursor.read_array()?))
}

pub fn read_u64_le(cursor: &mut ByteCursor<'_>) -> Result<u64> {
    Ok(u64::from_le_bytes(cursor.read_array()?))
}

pub fn read_i64_le(cursor: &mut ByteCursor<'_>) -> Result<i64> {
    Ok(i64::from_le_bytes(cursor.read_array()?))
}

/// Decodes a canonical compact-size integer
pub fn read_varint(cursor: &mut ByteCursor<'_>) -> Result<u64> {
    let (value, min) = match read_u8(cursor)? {
        prefix @ 0x00..=0xfc => return Ok(prefix as u64),
        0xfd => (read_u16_le(cursor)? as u64, 0xfd),
        0xfe => (read_u32_le(cursor)? as u64, 0x10000),
        0xff => (read_u64_le(cursor)?, 0x1_0000_0000),
    };
    if value < min {
        return Err(DecodeError::new(
            Domain::Codec,
            ErrorKind::NonCanonicalVarInt,
            format!("value {} encoded in a {}-byte form", value, varint_width(min)),
        ));
    }
    Ok(value)
}

/// Reads a varint element count and rejects it before anything is allocated
/// for it if it exceeds `max`.
pub fn read_count(
    cursor: &mut ByteCursor<'_>,
    max: usize,
    kind: ErrorKind,
    domain: Domain,
) -> Result<usize> {
    let count = read_varint(cursor)?;
    if count > max as u64 {
        return Err(DecodeError::new(
            domain,
            kind,
            format!("count {} exceeds maximum {}", count, max),
        ));
    }
    Ok(count as usize)
}

/// Capacity to reserve for `count` elements of at least `min_size` bytes each.
///
/// Never reserves more elements than the remaining input could hold.
pub fn bounded_capacity(cursor: &ByteCursor<'_>, count: usize, min_size: usize) -> usize {
    count.min(cursor.remaining() / min_size.max(1))
}

/// Encoded width of a compact-size integer
pub fn varint_len(value: u64) -> usize {
    varint_width(value)
}

fn varint_width(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x10000..=0xffff_ffff => 5,
        _ => 9,
    }
}

pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x10000..=0xffff_ffff => {
            out.push(0xfe);
            write_u32_le(out, value as u32);
        }
        _ => {
            out.push(0xff);
            write_u64_le(out, value);
        }
    }
}

pub fn write_u32_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_u64_le(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn write_i64_le(out: &mut Vec<u8>, value: i64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Writes a varint length prefix followed by the bytes themselves
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Encoded width of a length-prefixed byte string
pub fn var_bytes_len(len: usize) -> usize {
    varint_len(len as u64) + len
}
