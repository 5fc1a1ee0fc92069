//! Protocol constants bounding everything the decoders accept

/// Maximum money supply: 21,000,000 BTC in satoshis
pub const MAX_MONEY: i64 = 21_000_000 * SATOSHIS_PER_BTC;

/// Satoshis per BTC
pub const SATOSHIS_PER_BTC: i64 = 100_000_000;

/// Maximum serialized transaction size: 1MB
pub const MAX_TX_SIZE: usize = 1_000_000;

/// Maximum serialized block size: 4MB
pub const MAX_BLOCK_SIZE: usize = 4_000_000;

/// Maximum script length
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Serialized block header size
pub const BLOCK_HEADER_SIZE: usize = 80;

/// Smallest possible input: outpoint (36) + empty script (1) + sequence (4)
pub const MIN_INPUT_SIZE: usize = 41;

/// Smallest possible output: amount (8) + empty script (1)
pub const MIN_OUTPUT_SIZE: usize = 9;

/// Smallest possible transaction: version, one input, one output, lock time
pub const MIN_TX_SIZE: usize = 4 + 1 + MIN_INPUT_SIZE + 1 + MIN_OUTPUT_SIZE + 4;

/// Maximum number of inputs per transaction
pub const MAX_INPUTS: usize = MAX_TX_SIZE / MIN_INPUT_SIZE;

/// Maximum number of outputs per transaction
pub const MAX_OUTPUTS: usize = MAX_TX_SIZE / MIN_OUTPUT_SIZE;

/// Maximum number of transactions per block
pub const MAX_TRANSACTIONS: usize = MAX_BLOCK_SIZE / MIN_TX_SIZE;

/// Sequence number for final transaction
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Previous output index used by coinbase inputs
pub const COINBASE_INDEX: u32 = 0xffffffff;
