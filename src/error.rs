//! Error types for decoding and building primitives

use std::fmt;
use thiserror::Error;

/// Component that produced a [`DecodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Cursor and primitive integer codec
    Codec,
    ScriptPubkey,
    TransactionOutput,
    Transaction,
    Block,
    Chain,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Codec => "Codec",
            Domain::ScriptPubkey => "ScriptPubkey",
            Domain::TransactionOutput => "TransactionOutput",
            Domain::Transaction => "Transaction",
            Domain::Block => "Block",
            Domain::Chain => "Chain",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of failure, stable across releases via [`ErrorKind::code`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    #[error("truncated input")]
    TruncatedInput,

    #[error("non-canonical varint")]
    NonCanonicalVarInt,

    #[error("script too large")]
    ScriptTooLarge,

    #[error("too many inputs")]
    TooManyInputs,

    #[error("too many outputs")]
    TooManyOutputs,

    #[error("too many transactions")]
    TooManyTransactions,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("index out of range")]
    IndexOutOfRange,

    #[error("trailing bytes")]
    TrailingBytes,

    #[error("transaction has no inputs")]
    EmptyInputs,

    #[error("transaction has no outputs")]
    EmptyOutputs,

    #[error("transaction too large")]
    TransactionTooLarge,

    #[error("block too large")]
    BlockTooLarge,

    #[error("block does not extend the chain tip")]
    DisconnectedBlock,
}

impl ErrorKind {
    /// Numeric code exposed across the error-reporting boundary
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::TruncatedInput => 1,
            ErrorKind::NonCanonicalVarInt => 2,
            ErrorKind::ScriptTooLarge => 3,
            ErrorKind::TooManyInputs => 4,
            ErrorKind::TooManyOutputs => 5,
            ErrorKind::TooManyTransactions => 6,
            ErrorKind::InvalidAmount => 7,
            ErrorKind::IndexOutOfRange => 8,
            ErrorKind::TrailingBytes => 9,
            ErrorKind::EmptyInputs => 10,
            ErrorKind::EmptyOutputs => 11,
            ErrorKind::TransactionTooLarge => 12,
            ErrorKind::BlockTooLarge => 13,
            ErrorKind::DisconnectedBlock => 14,
        }
    }

    /// Whether supplying more bytes could turn this failure into a success.
    ///
    /// Only truncation qualifies; every other kind describes input that is
    /// malformed no matter what follows it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::TruncatedInput)
    }
}

/// Structured failure returned by every fallible constructor and decoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{domain}:{}] {message}", .kind.code())]
pub struct DecodeError {
    domain: Domain,
    kind: ErrorKind,
    message: String,
}

impl DecodeError {
    pub fn new(domain: Domain, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            domain,
            kind,
            message: message.into(),
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
