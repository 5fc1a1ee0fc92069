//! Transactions: decode, encode, identity hash and builder

use log::{debug, trace};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::codec::{
    bounded_capacity, read_count, read_u32_le, var_bytes_len, varint_len, write_u32_le,
    write_var_bytes, write_varint, Decodable, Encodable,
};
use crate::constants::*;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Domain, ErrorKind, Result};
use crate::hash::sha256d;
use crate::output::TransactionOutput;
use crate::script::{check_script_len, read_script_bytes};
use crate::types::{serialize_hex, ByteString, Txid};

/// OutPoint: reference to output `index` of transaction `hash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OutPoint {
    pub hash: Txid,
    pub index: u32,
}

impl OutPoint {
    /// The outpoint spent by coinbase inputs
    pub const fn null() -> Self {
        Self {
            hash: Txid([0u8; 32]),
            index: COINBASE_INDEX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.index == COINBASE_INDEX && self.hash.is_all_zeros()
    }
}

impl Decodable for OutPoint {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let hash = Txid(cursor.read_array()?);
        let index = read_u32_le(cursor)?;
        Ok(Self { hash, index })
    }
}

impl Encodable for OutPoint {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.hash.as_bytes());
        write_u32_le(out, self.index);
    }

    fn encoded_len(&self) -> usize {
        36
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}

/// Transaction Input: spent outpoint, unlocking script and sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    #[serde(serialize_with = "serialize_hex")]
    pub script_sig: ByteString,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn new(prevout: OutPoint, script_sig: ByteString, sequence: u32) -> Self {
        Self {
            prevout,
            script_sig,
            sequence,
        }
    }

    /// Coinbase input carrying arbitrary `script_sig` data
    pub fn coinbase(script_sig: ByteString) -> Self {
        Self::new(OutPoint::null(), script_sig, SEQUENCE_FINAL)
    }
}

impl Decodable for TransactionInput {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let prevout = OutPoint::decode(cursor)?;
        let script_sig = read_script_bytes(cursor, Domain::Transaction)?.to_vec();
        let sequence = read_u32_le(cursor)?;
        Ok(Self {
            prevout,
            script_sig,
            sequence,
        })
    }
}

impl Encodable for TransactionInput {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.prevout.encode_to(out);
        write_var_bytes(out, &self.script_sig);
        write_u32_le(out, self.sequence);
    }

    fn encoded_len(&self) -> usize {
        36 + var_bytes_len(self.script_sig.len()) + 4
    }
}

impl fmt::Display for TransactionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prevout.is_null() {
            write!(f, "TransactionInput(coinbase={}", hex::encode(&self.script_sig))?;
        } else {
            write!(
                f,
                "TransactionInput(prevout={}, script_sig={}",
                self.prevout,
                hex::encode(&self.script_sig)
            )?;
        }
        if self.sequence != SEQUENCE_FINAL {
            write!(f, ", sequence={}", self.sequence)?;
        }
        f.write_str(")")
    }
}

/// A finalized transaction.
///
/// Built only by [`Transaction::decode`] or [`TransactionBuilder::build`], so
/// every instance satisfies the structural invariants: at least one input and
/// one output, counts within [`MAX_INPUTS`]/[`MAX_OUTPUTS`], scripts within
/// [`MAX_SCRIPT_SIZE`] and an encoding no larger than [`MAX_TX_SIZE`].
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    version: u32,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    lock_time: u32,
    #[serde(skip)]
    txid: OnceLock<Txid>,
}

impl Transaction {
    fn from_parts(
        version: u32,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        lock_time: u32,
    ) -> Self {
        Self {
            version,
            inputs,
            outputs,
            lock_time,
            txid: OnceLock::new(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn input_at(&self, idx: usize) -> Result<&TransactionInput> {
        self.inputs.get(idx).ok_or_else(|| {
            DecodeError::new(
                Domain::Transaction,
                ErrorKind::IndexOutOfRange,
                format!("input index {} out of range ({} inputs)", idx, self.inputs.len()),
            )
        })
    }

    pub fn output_at(&self, idx: usize) -> Result<&TransactionOutput> {
        self.outputs.get(idx).ok_or_else(|| {
            DecodeError::new(
                Domain::Transaction,
                ErrorKind::IndexOutOfRange,
                format!("output index {} out of range ({} outputs)", idx, self.outputs.len()),
            )
        })
    }

    /// Identity hash: double SHA-256 of the canonical encoding, computed on
    /// first use and cached.
    pub fn hash(&self) -> Txid {
        *self.txid.get_or_init(|| Txid(sha256d(&self.encode())))
    }

    /// Serialized size in bytes
    pub fn size(&self) -> usize {
        self.encoded_len()
    }

    /// Single input spending the null outpoint
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }
}

// The cached txid is derived data and takes no part in equality.
impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.lock_time == other.lock_time
            && self.inputs == other.inputs
            && self.outputs == other.outputs
    }
}

impl Eq for Transaction {}

fn check_tx_size(size: usize) -> Result<()> {
    if size > MAX_TX_SIZE {
        return Err(DecodeError::new(
            Domain::Transaction,
            ErrorKind::TransactionTooLarge,
            format!("transaction size {} exceeds maximum {}", size, MAX_TX_SIZE),
        ));
    }
    Ok(())
}

fn empty_inputs() -> DecodeError {
    DecodeError::new(Domain::Transaction, ErrorKind::EmptyInputs, "transaction has no inputs")
}

fn empty_outputs() -> DecodeError {
    DecodeError::new(Domain::Transaction, ErrorKind::EmptyOutputs, "transaction has no outputs")
}

impl Decodable for Transaction {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let start = cursor.position();
        let version = read_u32_le(cursor)?;

        let input_count =
            read_count(cursor, MAX_INPUTS, ErrorKind::TooManyInputs, Domain::Transaction)?;
        if input_count == 0 {
            return Err(empty_inputs());
        }
        let mut inputs =
            Vec::with_capacity(bounded_capacity(cursor, input_count, MIN_INPUT_SIZE));
        for _ in 0..input_count {
            inputs.push(TransactionInput::decode(cursor)?);
            check_tx_size(cursor.position() - start)?;
        }

        let output_count =
            read_count(cursor, MAX_OUTPUTS, ErrorKind::TooManyOutputs, Domain::Transaction)?;
        if output_count == 0 {
            return Err(empty_outputs());
        }
        let mut outputs =
            Vec::with_capacity(bounded_capacity(cursor, output_count, MIN_OUTPUT_SIZE));
        for _ in 0..output_count {
            outputs.push(TransactionOutput::decode(cursor)?);
            check_tx_size(cursor.position() - start)?;
        }

        let lock_time = read_u32_le(cursor)?;

        let size = cursor.position() - start;
        check_tx_size(size)?;

        debug!(
            "decoded transaction: {} inputs, {} outputs, {} bytes",
            input_count, output_count, size
        );
        Ok(Self::from_parts(version, inputs, outputs, lock_time))
    }
}

impl Encodable for Transaction {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_u32_le(out, self.version);
        write_varint(out, self.inputs.len() as u64);
        for input in &self.inputs {
            input.encode_to(out);
        }
        write_varint(out, self.outputs.len() as u64);
        for output in &self.outputs {
            output.encode_to(out);
        }
        write_u32_le(out, self.lock_time);
    }

    fn encoded_len(&self) -> usize {
        4 + varint_len(self.inputs.len() as u64)
            + self.inputs.iter().map(Encodable::encoded_len).sum::<usize>()
            + varint_len(self.outputs.len() as u64)
            + self.outputs.iter().map(Encodable::encoded_len).sum::<usize>()
            + 4
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Transaction(txid={}, version={}, inputs={}, outputs={}, lock_time={})",
            self.hash(),
            self.version,
            self.inputs.len(),
            self.outputs.len(),
            self.lock_time
        )?;
        for input in &self.inputs {
            writeln!(f, "    {}", input)?;
        }
        for output in &self.outputs {
            writeln!(f, "    {}", output)?;
        }
        Ok(())
    }
}

/// Assembles a [`Transaction`], enforcing the same invariants as decoding
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    version: u32,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    lock_time: u32,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    pub fn input(mut self, input: TransactionInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Marks the transaction as a coinbase by spending the null outpoint
    pub fn coinbase_input(self, script_sig: ByteString) -> Self {
        self.input(TransactionInput::coinbase(script_sig))
    }

    pub fn output(mut self, output: TransactionOutput) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn build(self) -> Result<Transaction> {
        if self.inputs.is_empty() {
            return Err(empty_inputs());
        }
        if self.inputs.len() > MAX_INPUTS {
            return Err(DecodeError::new(
                Domain::Transaction,
                ErrorKind::TooManyInputs,
                format!("{} inputs exceed maximum {}", self.inputs.len(), MAX_INPUTS),
            ));
        }
        if self.outputs.is_empty() {
            return Err(empty_outputs());
        }
        if self.outputs.len() > MAX_OUTPUTS {
            return Err(DecodeError::new(
                Domain::Transaction,
                ErrorKind::TooManyOutputs,
                format!("{} outputs exceed maximum {}", self.outputs.len(), MAX_OUTPUTS),
            ));
        }
        for input in &self.inputs {
            check_script_len(input.script_sig.len() as u64, Domain::Transaction)?;
        }

        let tx = Transaction::from_parts(self.version, self.inputs, self.outputs, self.lock_time);
        check_tx_size(tx.encoded_len())?;
        trace!("built transaction {}", tx.hash());
        Ok(tx)
    }
}
