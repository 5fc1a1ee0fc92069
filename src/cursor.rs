//! Forward-only reader over an immutable byte buffer

use crate::error::{DecodeError, Domain, ErrorKind, Result};

/// Bounds-checked cursor shared by every decoder of a single decode call.
///
/// Reads borrow from the underlying buffer; nothing is copied until a
/// decoder decides to own the bytes.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next `n` bytes and advances past them.
    ///
    /// On failure the cursor is left where it was.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(DecodeError::new(
                Domain::Codec,
                ErrorKind::TruncatedInput,
                format!(
                    "need {} bytes at offset {}, {} remaining",
                    n,
                    self.pos,
                    self.remaining()
                ),
            ));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Ends the decode, requiring the whole buffer to have been consumed
    pub fn finish(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::new(
                Domain::Codec,
                ErrorKind::TrailingBytes,
                format!("{} unread bytes after offset {}", self.remaining(), self.pos),
            ))
        }
    }
}
