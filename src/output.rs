//! Transaction outputs: an amount locked by a script pubkey

use serde::Serialize;
use std::fmt;

use crate::codec::{read_i64_le, write_i64_le, Decodable, Encodable};
use crate::constants::{MAX_MONEY, SATOSHIS_PER_BTC};
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Domain, ErrorKind, Result};
use crate::script::ScriptPubkey;

/// Transaction Output: amount in satoshis plus the script that locks it.
///
/// Invariant: 0 ≤ amount ≤ [`MAX_MONEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionOutput {
    amount: i64,
    script_pubkey: ScriptPubkey,
}

impl TransactionOutput {
    pub fn new(amount: i64, script_pubkey: ScriptPubkey) -> Result<Self> {
        check_amount(amount)?;
        Ok(Self {
            amount,
            script_pubkey,
        })
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn script_pubkey(&self) -> &ScriptPubkey {
        &self.script_pubkey
    }

    pub fn into_parts(self) -> (i64, ScriptPubkey) {
        (self.amount, self.script_pubkey)
    }
}

fn check_amount(amount: i64) -> Result<()> {
    if !(0..=MAX_MONEY).contains(&amount) {
        return Err(DecodeError::new(
            Domain::TransactionOutput,
            ErrorKind::InvalidAmount,
            format!("amount {} outside 0..={}", amount, MAX_MONEY),
        ));
    }
    Ok(())
}

impl Decodable for TransactionOutput {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let amount = read_i64_le(cursor)?;
        check_amount(amount)?;
        let script_pubkey = ScriptPubkey::decode(cursor)?;
        Ok(Self {
            amount,
            script_pubkey,
        })
    }
}

impl Encodable for TransactionOutput {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_i64_le(out, self.amount);
        self.script_pubkey.encode_to(out);
    }

    fn encoded_len(&self) -> usize {
        8 + self.script_pubkey.encoded_len()
    }
}

impl fmt::Display for TransactionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransactionOutput(amount={}.{:08}, script_pubkey={})",
            self.amount / SATOSHIS_PER_BTC,
            self.amount % SATOSHIS_PER_BTC,
            self.script_pubkey
        )
    }
}
