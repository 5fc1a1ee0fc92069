//! Script pubkeys: opaque locking scripts carried by transaction outputs

use serde::{Serialize, Serializer};
use std::fmt;

use crate::codec::{read_varint, var_bytes_len, write_var_bytes, Decodable, Encodable};
use crate::constants::MAX_SCRIPT_SIZE;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Domain, ErrorKind, Result};

/// An immutable locking script.
///
/// The bytes are not parsed into opcodes here; two scripts are equal exactly
/// when their bytes are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ScriptPubkey {
    bytes: Box<[u8]>,
}

impl ScriptPubkey {
    /// Wraps `bytes`, failing with `ScriptTooLarge` above [`MAX_SCRIPT_SIZE`]
    pub fn new(bytes: &[u8]) -> Result<Self> {
        check_script_len(bytes.len() as u64, Domain::ScriptPubkey)?;
        Ok(Self {
            bytes: bytes.into(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Rejects a declared script length above [`MAX_SCRIPT_SIZE`]
pub(crate) fn check_script_len(len: u64, domain: Domain) -> Result<()> {
    if len > MAX_SCRIPT_SIZE as u64 {
        return Err(DecodeError::new(
            domain,
            ErrorKind::ScriptTooLarge,
            format!("script length {} exceeds maximum {}", len, MAX_SCRIPT_SIZE),
        ));
    }
    Ok(())
}

/// Reads a length-prefixed script, checking the length before reading
pub(crate) fn read_script_bytes<'a>(
    cursor: &mut ByteCursor<'a>,
    domain: Domain,
) -> Result<&'a [u8]> {
    let len = read_varint(cursor)?;
    check_script_len(len, domain)?;
    cursor.read_bytes(len as usize)
}

impl Decodable for ScriptPubkey {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let bytes = read_script_bytes(cursor, Domain::ScriptPubkey)?;
        Ok(Self {
            bytes: bytes.into(),
        })
    }
}

impl Encodable for ScriptPubkey {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_var_bytes(out, &self.bytes);
    }

    fn encoded_len(&self) -> usize {
        var_bytes_len(self.bytes.len())
    }
}

impl TryFrom<&[u8]> for ScriptPubkey {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        ScriptPubkey::new(bytes)
    }
}

impl From<ScriptPubkey> for Vec<u8> {
    fn from(script: ScriptPubkey) -> Self {
        script.bytes.into_vec()
    }
}

impl AsRef<[u8]> for ScriptPubkey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for ScriptPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.bytes))
    }
}

impl Serialize for ScriptPubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
