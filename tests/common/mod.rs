//! Shared fixtures for integration tests

#![allow(dead_code)]

use consensus_codec::*;

/// Bitcoin mainnet genesis block
pub const GENESIS_BLOCK_HEX: &str = concat!(
    "01000000",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a",
    "29ab5f49",
    "ffff001d",
    "1dac2b7c",
    "01",
    "01000000",
    "01",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "ffffffff",
    "4d",
    "04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72",
    "206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73",
    "ffffffff",
    "01",
    "00f2052a01000000",
    "43",
    "4104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38",
    "c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac",
    "00000000",
);

pub const GENESIS_BLOCK_HASH: &str =
    "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";

pub const GENESIS_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn genesis_bytes() -> Vec<u8> {
    hex::decode(GENESIS_BLOCK_HEX).unwrap()
}

pub fn p2pkh_script(tag: u8) -> ScriptPubkey {
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend_from_slice(&[tag; 20]);
    script.extend_from_slice(&[0x88, 0xac]);
    ScriptPubkey::new(&script).unwrap()
}

pub fn coinbase_tx(height: u8) -> Transaction {
    TransactionBuilder::new()
        .coinbase_input(vec![0x01, height])
        .output(TransactionOutput::new(5_000_000_000, p2pkh_script(height)).unwrap())
        .build()
        .unwrap()
}

pub fn spending_tx(prev: Txid, outputs: &[i64]) -> Transaction {
    let mut builder = TransactionBuilder::new().input(TransactionInput::new(
        OutPoint { hash: prev, index: 0 },
        vec![0x51],
        SEQUENCE_FINAL,
    ));
    for (i, amount) in outputs.iter().enumerate() {
        builder = builder.output(TransactionOutput::new(*amount, p2pkh_script(i as u8)).unwrap());
    }
    builder.build().unwrap()
}

pub fn two_tx_block() -> Block {
    let coinbase = coinbase_tx(1);
    let spend = spending_tx(coinbase.hash(), &[1_000, 2_000]);
    BlockBuilder::new()
        .prev_block_hash(GENESIS_BLOCK_HASH.parse().unwrap())
        .timestamp(1_231_469_665)
        .bits(0x1d00ffff)
        .transaction(coinbase)
        .transaction(spend)
        .build()
        .unwrap()
}
