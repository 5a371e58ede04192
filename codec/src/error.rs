//! Wire-format errors. Every variant is a `MalformedWireData` condition:
//! decoding never truncates or guesses, it stops at the first violation.

use thiserror::Error;
use xbridge_types::CurrencyId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("varint overflow at offset {0}")]
    VarIntOverflow(usize),

    #[error("non-canonical compact size at offset {0}")]
    NonCanonicalSize(usize),

    #[error("invalid destination type tag {0:#04x}")]
    InvalidDestinationType(u8),

    #[error("{kind} destination must be {expected} bytes, got {actual}")]
    InvalidDestinationLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("destinations nested deeper than {0}")]
    NestingTooDeep(usize),

    #[error("auxiliary destination flag set with an empty list")]
    EmptyAuxDestinations,

    #[error("duplicate currency {0} in value map")]
    DuplicateCurrency(CurrencyId),

    #[error("amount {0} exceeds the maximum representable amount")]
    AmountOutOfRange(u64),

    #[error("single-value map must hold exactly one entry, found {0}")]
    SingleValueCardinality(usize),

    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("invalid currency definition: {0}")]
    InvalidCurrencyDefinition(String),

    #[error("unsupported {what} version {version}")]
    UnsupportedVersion { what: &'static str, version: u32 },

    #[error("expected {expected} transfers, buffer held {decoded}")]
    MissingTransfers { expected: usize, decoded: usize },

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}
