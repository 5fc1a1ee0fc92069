//! # Consensus-Codec
//!
//! Canonical wire encoding and object model for Bitcoin blocks and transactions.
//!
//! This crate turns raw bytes into finalized, immutable values (blocks,
//! transactions, outputs, script pubkeys) and back. It performs the structural
//! validation that belongs to parsing and nothing more: consensus rules, script
//! execution and chain state live with the callers of this crate.
//!
//! ## Architecture
//!
//! Decoding is layered, leaf-first:
//! - `ByteCursor` (bounds-checked reads over the input buffer)
//! - Primitive codec (compact-size varints, little-endian integers)
//! - `ScriptPubkey` → `TransactionOutput` → `Transaction` → `Block`
//!
//! Each layer advances the same cursor and returns the innermost error
//! unchanged when anything fails.
//!
//! ## Design Principles
//!
//! 1. **Canonical Encoding**: exactly one byte encoding per value; anything else is rejected
//! 2. **Bounded Allocation**: every length prefix is checked against a protocol maximum first
//! 3. **Immutable Values**: finalized entities never change, so they are shared across threads
//! 4. **Hashes From Bytes**: identity hashes are computed over the canonical encoding and cached
//!
//! ## Usage
//!
//! ```rust
//! use consensus_codec::*;
//!
//! let tx = TransactionBuilder::new()
//!     .coinbase_input(vec![0x01, 0x01])
//!     .output(TransactionOutput::new(5_000_000_000, ScriptPubkey::new(&[0x51]).unwrap()).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let bytes = tx.encode();
//! let decoded = Codec::new().decode_transaction(&bytes).unwrap();
//! assert_eq!(decoded, tx);
//! assert_eq!(decoded.hash(), tx.hash());
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod config;
pub mod cursor;
pub mod codec;
pub mod hash;
pub mod script;
pub mod output;
pub mod transaction;
pub mod block;
pub mod chain;

use log::debug;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{DecodeError, Domain, ErrorKind, Result};
pub use config::{ConfigError, DecodeConfig};
pub use cursor::ByteCursor;
pub use codec::{Decodable, Encodable};
pub use script::ScriptPubkey;
pub use output::TransactionOutput;
pub use transaction::{OutPoint, Transaction, TransactionBuilder, TransactionInput};
pub use block::{Block, BlockBuilder, BlockHeader};
pub use chain::Chain;

/// Entry point for decoding whole buffers under a [`DecodeConfig`]
///
/// # Examples
///
/// ```
/// use consensus_codec::{Codec, DecodeConfig, ErrorKind};
///
/// // A script pubkey of one byte followed by one stray byte
/// let bytes = [0x01, 0x51, 0x00];
///
/// let strict = Codec::new();
/// let err = strict.decode_script_pubkey(&bytes).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::TrailingBytes);
///
/// let lenient = Codec::with_config(DecodeConfig::lenient());
/// let script = lenient.decode_script_pubkey(&bytes).unwrap();
/// assert_eq!(script.as_bytes(), &[0x51]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    config: DecodeConfig,
}

impl Codec {
    /// Create a codec with the default (strict) configuration
    ///
    /// # Examples
    ///
    /// ```
    /// use consensus_codec::Codec;
    ///
    /// let codec = Codec::new();
    /// assert!(codec.config().strict);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode a block from its wire encoding
    ///
    /// # Examples
    ///
    /// ```
    /// use consensus_codec::{Codec, ErrorKind};
    ///
    /// // Shorter than the 80-byte header
    /// let err = Codec::new().decode_block(&[0u8; 79]).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    /// ```
    pub fn decode_block(&self, bytes: &[u8]) -> Result<Block> {
        self.decode(bytes)
    }

    /// Decode a transaction from its wire encoding
    pub fn decode_transaction(&self, bytes: &[u8]) -> Result<Transaction> {
        self.decode(bytes)
    }

    /// Decode a single transaction output
    ///
    /// # Examples
    ///
    /// ```
    /// use consensus_codec::Codec;
    ///
    /// let mut bytes = 1_000i64.to_le_bytes().to_vec();
    /// bytes.extend_from_slice(&[0x01, 0x51]);
    ///
    /// let output = Codec::new().decode_output(&bytes).unwrap();
    /// assert_eq!(output.amount(), 1_000);
    /// assert_eq!(output.script_pubkey().as_bytes(), &[0x51]);
    /// ```
    pub fn decode_output(&self, bytes: &[u8]) -> Result<TransactionOutput> {
        self.decode(bytes)
    }

    /// Decode a length-prefixed script pubkey
    pub fn decode_script_pubkey(&self, bytes: &[u8]) -> Result<ScriptPubkey> {
        self.decode(bytes)
    }

    /// Canonical encoding of any encodable value
    pub fn encode<T: Encodable>(&self, value: &T) -> Vec<u8> {
        value.encode()
    }

    fn decode<T: Decodable>(&self, bytes: &[u8]) -> Result<T> {
        let mut cursor = ByteCursor::new(bytes);
        let value = T::decode(&mut cursor)?;
        if self.config.strict {
            cursor.finish()?;
        } else if !cursor.is_empty() {
            debug!("ignoring {} trailing bytes", cursor.remaining());
        }
        Ok(value)
    }
}
