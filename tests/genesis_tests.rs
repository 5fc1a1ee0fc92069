//! Decoding the Bitcoin genesis block end to end

mod common;

use common::*;
use consensus_codec::*;

#[test]
fn test_genesis_block_decodes() {
    init_logging();
    let block = Block::from_bytes(&genesis_bytes()).unwrap();

    let header = block.header();
    assert_eq!(header.version, 1);
    assert!(header.prev_block_hash.is_all_zeros());
    assert_eq!(header.timestamp, 1_231_006_505);
    assert_eq!(header.bits, 0x1d00ffff);
    assert_eq!(header.nonce, 2_083_236_893);
    assert_eq!(block.transaction_count(), 1);
    assert_eq!(block.size(), 285);
}

#[test]
fn test_genesis_block_hash() {
    let block = Block::from_bytes(&genesis_bytes()).unwrap();
    assert_eq!(block.hash().to_string(), GENESIS_BLOCK_HASH);
    assert_eq!(block.hash(), GENESIS_BLOCK_HASH.parse::<BlockHash>().unwrap());
}

#[test]
fn test_genesis_coinbase() {
    let block = Block::from_bytes(&genesis_bytes()).unwrap();
    let coinbase = block.transaction_at(0).unwrap();

    assert!(coinbase.is_coinbase());
    assert_eq!(coinbase.hash().to_string(), GENESIS_TXID);
    assert_eq!(coinbase.input_count(), 1);
    assert_eq!(coinbase.output_count(), 1);
    assert_eq!(coinbase.input_at(0).unwrap().script_sig.len(), 77);

    let output = coinbase.output_at(0).unwrap();
    assert_eq!(output.amount(), 50 * SATOSHIS_PER_BTC);
    assert_eq!(output.script_pubkey().len(), 67);
    assert_eq!(output.script_pubkey().as_bytes().last(), Some(&0xac));
}

#[test]
fn test_genesis_merkle_root_is_coinbase_txid() {
    let block = Block::from_bytes(&genesis_bytes()).unwrap();
    assert!(block.validate_merkle_root());
    assert_eq!(
        block.header().merkle_root.to_byte_array(),
        block.transaction_at(0).unwrap().hash().to_byte_array()
    );
}

#[test]
fn test_genesis_reencodes_byte_identically() {
    let bytes = genesis_bytes();
    let block = Block::from_bytes(&bytes).unwrap();
    assert_eq!(block.encode(), bytes);
}

#[test]
fn test_genesis_tampered_merkle_root() {
    let mut bytes = genesis_bytes();
    // merkle root occupies header bytes 36..68
    bytes[36] ^= 0x01;
    let block = Block::from_bytes(&bytes).unwrap();
    assert!(!block.validate_merkle_root());
    assert_ne!(block.hash().to_string(), GENESIS_BLOCK_HASH);
}

#[test]
fn test_genesis_display() {
    let block = Block::from_bytes(&genesis_bytes()).unwrap();
    let rendered = block.transaction_at(0).unwrap().to_string();
    assert!(rendered.contains(GENESIS_TXID));
    assert!(rendered.contains("TransactionInput(coinbase=04ffff001d"));
    assert!(rendered.contains("TransactionOutput(amount=50.00000000"));
}

#[test]
fn test_genesis_truncated_anywhere() {
    let bytes = genesis_bytes();
    for len in (0..bytes.len()).step_by(7) {
        let err = Block::from_bytes(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput, "prefix of {} bytes", len);
        assert!(err.kind().is_retryable());
    }
}
