//! Blocks: 80-byte header plus an ordered list of transactions

use log::{debug, trace};
use serde::Serialize;
use std::sync::OnceLock;

use crate::codec::{
    bounded_capacity, read_count, read_u32_le, varint_len, write_u32_le, write_varint, Decodable,
    Encodable,
};
use crate::constants::*;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Domain, ErrorKind, Result};
use crate::hash::{merkle_root, sha256d};
use crate::transaction::Transaction;
use crate::types::{BlockHash, MerkleRoot};

/// Block Header: fixed 80-byte commitment to the previous block and to the
/// block's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_block_hash: BlockHash,
    pub merkle_root: MerkleRoot,
    pub timestamp: u32,
    /// Compact difficulty target
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Double SHA-256 of the encoded header
    pub fn hash(&self) -> BlockHash {
        BlockHash(sha256d(&self.encode()))
    }
}

impl Decodable for BlockHeader {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        // Take the whole header up front so a short buffer fails as one unit
        let mut raw = ByteCursor::new(cursor.read_bytes(BLOCK_HEADER_SIZE)?);
        Ok(Self {
            version: read_u32_le(&mut raw)?,
            prev_block_hash: BlockHash(raw.read_array()?),
            merkle_root: MerkleRoot(raw.read_array()?),
            timestamp: read_u32_le(&mut raw)?,
            bits: read_u32_le(&mut raw)?,
            nonce: read_u32_le(&mut raw)?,
        })
    }
}

impl Encodable for BlockHeader {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_u32_le(out, self.version);
        out.extend_from_slice(self.prev_block_hash.as_bytes());
        out.extend_from_slice(self.merkle_root.as_bytes());
        write_u32_le(out, self.timestamp);
        write_u32_le(out, self.bits);
        write_u32_le(out, self.nonce);
    }

    fn encoded_len(&self) -> usize {
        BLOCK_HEADER_SIZE
    }
}

/// A finalized block.
///
/// Owns its transactions exclusively. The block hash covers the header only
/// and is cached after first use.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<Transaction>,
    #[serde(skip)]
    hash: OnceLock<BlockHash>,
}

impl Block {
    fn from_parts(header: BlockHeader, transactions: Vec<Transaction>) -> Self {
        Self {
            header,
            transactions,
            hash: OnceLock::new(),
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn transaction_at(&self, idx: usize) -> Result<&Transaction> {
        self.transactions.get(idx).ok_or_else(|| {
            DecodeError::new(
                Domain::Block,
                ErrorKind::IndexOutOfRange,
                format!(
                    "transaction index {} out of range ({} transactions)",
                    idx,
                    self.transactions.len()
                ),
            )
        })
    }

    pub fn hash(&self) -> BlockHash {
        *self.hash.get_or_init(|| self.header.hash())
    }

    /// Serialized size in bytes
    pub fn size(&self) -> usize {
        self.encoded_len()
    }

    /// Merkle root over the contained transaction ids, `None` for a block
    /// without transactions.
    pub fn compute_merkle_root(&self) -> Option<MerkleRoot> {
        merkle_root(self.transactions.iter().map(|tx| tx.hash().to_byte_array())).map(MerkleRoot)
    }

    /// Whether the header commits to exactly these transactions.
    ///
    /// Decoding never performs this check; callers opt in.
    pub fn validate_merkle_root(&self) -> bool {
        self.compute_merkle_root() == Some(self.header.merkle_root)
    }
}

// The cached hash is derived data and takes no part in equality.
impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.transactions == other.transactions
    }
}

impl Eq for Block {}

fn block_too_large(size: usize) -> DecodeError {
    DecodeError::new(
        Domain::Block,
        ErrorKind::BlockTooLarge,
        format!("block size {} exceeds maximum {}", size, MAX_BLOCK_SIZE),
    )
}

fn too_many_transactions(count: usize) -> DecodeError {
    DecodeError::new(
        Domain::Block,
        ErrorKind::TooManyTransactions,
        format!("count {} exceeds maximum {}", count, MAX_TRANSACTIONS),
    )
}

impl Decodable for Block {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let start = cursor.position();
        let header = BlockHeader::decode(cursor)?;

        let count = read_count(
            cursor,
            MAX_TRANSACTIONS,
            ErrorKind::TooManyTransactions,
            Domain::Block,
        )?;
        let mut transactions = Vec::with_capacity(bounded_capacity(cursor, count, MIN_TX_SIZE));
        for _ in 0..count {
            transactions.push(Transaction::decode(cursor)?);
            let size = cursor.position() - start;
            if size > MAX_BLOCK_SIZE {
                return Err(block_too_large(size));
            }
        }

        let block = Self::from_parts(header, transactions);
        debug!(
            "decoded block {} with {} transactions, {} bytes",
            block.hash(),
            count,
            cursor.position() - start
        );
        Ok(block)
    }
}

impl Encodable for Block {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.header.encode_to(out);
        write_varint(out, self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.encode_to(out);
        }
    }

    fn encoded_len(&self) -> usize {
        BLOCK_HEADER_SIZE
            + varint_len(self.transactions.len() as u64)
            + self.transactions.iter().map(Encodable::encoded_len).sum::<usize>()
    }
}

/// Assembles a [`Block`].
///
/// Unless [`BlockBuilder::merkle_root`] is given, the header commits to the
/// Merkle root of the supplied transactions.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    version: u32,
    prev_block_hash: BlockHash,
    merkle_root: Option<MerkleRoot>,
    timestamp: u32,
    bits: u32,
    nonce: u32,
    transactions: Vec<Transaction>,
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            version: 1,
            prev_block_hash: BlockHash::default(),
            merkle_root: None,
            timestamp: 0,
            bits: 0,
            nonce: 0,
            transactions: Vec::new(),
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn prev_block_hash(mut self, hash: BlockHash) -> Self {
        self.prev_block_hash = hash;
        self
    }

    /// Overrides the computed Merkle root
    pub fn merkle_root(mut self, root: MerkleRoot) -> Self {
        self.merkle_root = Some(root);
        self
    }

    pub fn timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    pub fn nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn transaction(mut self, tx: Transaction) -> Self {
        self.transactions.push(tx);
        self
    }

    pub fn build(self) -> Result<Block> {
        if self.transactions.len() > MAX_TRANSACTIONS {
            return Err(too_many_transactions(self.transactions.len()));
        }

        let merkle_root = match self.merkle_root {
            Some(root) => root,
            None => merkle_root(self.transactions.iter().map(|tx| tx.hash().to_byte_array()))
                .map(MerkleRoot)
                .unwrap_or_default(),
        };
        let header = BlockHeader {
            version: self.version,
            prev_block_hash: self.prev_block_hash,
            merkle_root,
            timestamp: self.timestamp,
            bits: self.bits,
            nonce: self.nonce,
        };

        let block = Block::from_parts(header, self.transactions);
        let size = block.encoded_len();
        if size > MAX_BLOCK_SIZE {
            return Err(block_too_large(size));
        }
        trace!("built block {}", block.hash());
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TransactionOutput;
    use crate::script::ScriptPubkey;
    use crate::transaction::{OutPoint, TransactionBuilder, TransactionInput};
    use crate::types::Txid;

    fn coinbase(tag: u8) -> Transaction {
        TransactionBuilder::new()
            .coinbase_input(vec![0x01, tag])
            .output(
                TransactionOutput::new(5_000_000_000, ScriptPubkey::new(&[0x51]).unwrap())
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn spend(prev: Txid) -> Transaction {
        TransactionBuilder::new()
            .input(TransactionInput::new(
                OutPoint { hash: prev, index: 0 },
                vec![],
                SEQUENCE_FINAL,
            ))
            .output(TransactionOutput::new(1_000, ScriptPubkey::new(&[0x52]).unwrap()).unwrap())
            .build()
            .unwrap()
    }

    fn two_tx_block() -> Block {
        let cb = coinbase(1);
        let next = spend(cb.hash());
        BlockBuilder::new()
            .timestamp(1_231_006_505)
            .bits(0x1d00ffff)
            .transaction(cb)
            .transaction(next)
            .build()
            .unwrap()
    }

    #[test]
    fn test_header_is_80_bytes() {
        let block = two_tx_block();
        assert_eq!(block.header().encode().len(), BLOCK_HEADER_SIZE);
    }

    #[test]
    fn test_header_truncated() {
        let header = two_tx_block().header().encode();
        for len in [0, 1, 40, 79] {
            let err = BlockHeader::from_bytes(&header[..len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        }
    }

    #[test]
    fn test_hash_covers_header_only() {
        let block = two_tx_block();
        assert_eq!(block.hash(), BlockHash(sha256d(&block.header().encode())));
        assert_eq!(block.hash(), block.header().hash());
    }

    #[test]
    fn test_decode_inverts_encode() {
        let block = two_tx_block();
        let bytes = block.encode();
        assert_eq!(bytes.len(), block.size());
        let decoded = Block::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.encode(), bytes);
        assert_eq!(decoded.hash(), block.hash());
    }

    #[test]
    fn test_builder_commits_to_merkle_root() {
        let block = two_tx_block();
        assert!(block.validate_merkle_root());
    }

    #[test]
    fn test_single_transaction_merkle_root_is_txid() {
        let cb = coinbase(7);
        let txid = cb.hash();
        let block = BlockBuilder::new().transaction(cb).build().unwrap();
        assert_eq!(block.header().merkle_root.to_byte_array(), txid.to_byte_array());
        assert!(block.validate_merkle_root());
    }

    #[test]
    fn test_tampered_merkle_root_still_decodes() {
        let block = BlockBuilder::new()
            .transaction(coinbase(1))
            .merkle_root(MerkleRoot([0xee; 32]))
            .build()
            .unwrap();
        let decoded = Block::from_bytes(&block.encode()).unwrap();
        assert!(!decoded.validate_merkle_root());
    }

    #[test]
    fn test_empty_block() {
        let block = BlockBuilder::new().build().unwrap();
        assert_eq!(block.transaction_count(), 0);
        assert_eq!(block.compute_merkle_root(), None);
        assert!(!block.validate_merkle_root());
        assert_eq!(Block::from_bytes(&block.encode()).unwrap(), block);
    }

    #[test]
    fn test_transaction_at_bounds() {
        let block = two_tx_block();
        assert!(block.transaction_at(0).unwrap().is_coinbase());
        assert!(!block.transaction_at(1).unwrap().is_coinbase());
        let err = block.transaction_at(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        assert_eq!(err.domain(), Domain::Block);
    }

    #[test]
    fn test_too_many_transactions() {
        let mut bytes = two_tx_block().header().encode();
        write_varint(&mut bytes, MAX_TRANSACTIONS as u64 + 1);
        let err = Block::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManyTransactions);
    }

    #[test]
    fn test_declared_transactions_missing() {
        let mut bytes = two_tx_block().header().encode();
        write_varint(&mut bytes, 3);
        let err = Block::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    // 99 maximal scriptSigs keep a single transaction just under its own limit
    fn near_limit_tx(tag: u8) -> Transaction {
        let mut builder = TransactionBuilder::new()
            .output(TransactionOutput::new(1_000, ScriptPubkey::new(&[0x51]).unwrap()).unwrap());
        for index in 0..99 {
            builder = builder.input(TransactionInput::new(
                OutPoint {
                    hash: Txid([tag; 32]),
                    index,
                },
                vec![0x51; MAX_SCRIPT_SIZE],
                SEQUENCE_FINAL,
            ));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_builder_rejects_oversized_block() {
        let mut builder = BlockBuilder::new();
        for tag in 0..4 {
            builder = builder.transaction(near_limit_tx(tag));
        }
        let block = builder.clone().build().unwrap();
        assert!(block.size() <= MAX_BLOCK_SIZE);

        let err = builder.transaction(near_limit_tx(4)).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BlockTooLarge);
        assert_eq!(err.domain(), Domain::Block);
    }

    #[test]
    fn test_decode_rejects_oversized_block() {
        let tx = near_limit_tx(0);
        assert!(tx.size() <= MAX_TX_SIZE);

        let mut bytes = vec![0u8; BLOCK_HEADER_SIZE];
        write_varint(&mut bytes, 5);
        for _ in 0..5 {
            tx.encode_to(&mut bytes);
        }
        assert!(bytes.len() > MAX_BLOCK_SIZE);

        let err = Block::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BlockTooLarge);
    }

    #[test]
    fn test_finalized_block_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Block>();
        assert_send_sync::<BlockHeader>();
    }
}
