//! Core hash and byte types

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Hash type: 256-bit digest in internal byte order
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Declares a 256-bit hash newtype displayed and parsed in the protocol's
/// reversed-hex convention.
macro_rules! hash_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub Hash);

        impl $name {
            pub const fn from_byte_array(bytes: Hash) -> Self {
                Self(bytes)
            }

            /// Digest bytes in internal (wire) order
            pub fn as_bytes(&self) -> &Hash {
                &self.0
            }

            pub fn to_byte_array(self) -> Hash {
                self.0
            }

            pub fn is_all_zeros(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl From<Hash> for $name {
            fn from(bytes: Hash) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut reversed = self.0;
                reversed.reverse();
                f.write_str(&hex::encode(reversed))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(s, &mut bytes)?;
                bytes.reverse();
                Ok(Self(bytes))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

hash_newtype! {
    /// Transaction identifier: double SHA-256 of the canonical transaction encoding
    Txid
}

hash_newtype! {
    /// Block identifier: double SHA-256 of the 80-byte header
    BlockHash
}

hash_newtype! {
    /// Root of the Merkle tree over a block's transaction ids
    MerkleRoot
}

/// Serializes raw bytes as a lowercase hex string
pub(crate) fn serialize_hex<T, S>(bytes: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";

    #[test]
    fn test_display_is_reversed_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        let hash = BlockHash(bytes);
        assert!(hash.to_string().ends_with("01"));
        assert!(hash.to_string().starts_with("00"));
    }

    #[test]
    fn test_parse_display_roundtrip() {
        let hash: BlockHash = GENESIS.parse().unwrap();
        assert_eq!(hash.to_string(), GENESIS);
        // Internal order starts with the low bytes
        assert_eq!(hash.as_bytes()[0], 0x6f);
        assert_eq!(hash.as_bytes()[31], 0x00);
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        assert!("abcd".parse::<Txid>().is_err());
        assert!("zz".repeat(32).parse::<Txid>().is_err());
    }

    #[test]
    fn test_serialize_as_hex_string() {
        let hash: Txid = GENESIS.parse().unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", GENESIS));
    }

    #[test]
    fn test_zero_hash() {
        assert!(Txid::default().is_all_zeros());
        assert!(!Txid([1; 32]).is_all_zeros());
    }
}
