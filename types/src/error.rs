//! Errors raised while constructing or validating core types.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid notary set: {0}")]
    InvalidNotarySet(String),

    #[error("invalid bridge parameters: {0}")]
    InvalidParams(String),
}
