//! Proof errors. Every variant means the proof is invalid; callers treat
//! them uniformly and abort.

use thiserror::Error;
use xbridge_types::Hash256;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("empty branch chain")]
    EmptyChain,

    #[error("unknown branch type {0}")]
    UnknownBranchType(u8),

    #[error("level size must be at least 1")]
    EmptyLevel,

    #[error("index {index} outside level of size {size}")]
    IndexOutOfRange { index: u64, size: u64 },

    #[error("level of size {size} needs {expected} sibling hashes, got {actual}")]
    SiblingCountMismatch {
        size: u64,
        expected: usize,
        actual: usize,
    },

    #[error("level of size {size} needs {expected} extra hashes, declared {actual}")]
    ExtraHashesMismatch {
        size: u64,
        expected: u32,
        actual: u32,
    },

    #[error("unsupported partial proof version {0}")]
    UnsupportedVersion(u32),

    #[error("partial proof has no components")]
    NoComponents,

    #[error("invalid component type {0}")]
    InvalidComponentType(u8),

    #[error("component {el_type} claims index {claimed} but its branch proves index {proven}")]
    ComponentIndexMismatch {
        el_type: u8,
        claimed: u32,
        proven: u64,
    },

    #[error("component {el_type} must carry exactly one binary branch, got {branches}")]
    ComponentBranchShape { el_type: u8, branches: usize },

    #[error("components disagree on transaction id: {first} vs {other}")]
    ComponentTxidMismatch { first: Hash256, other: Hash256 },

    #[error("proof commits height {height}, beyond the notarized height {notarized}")]
    HeightAboveRoot { height: u32, notarized: u32 },

    #[error("proof root {actual} does not match expected root {expected}")]
    RootMismatch { expected: Hash256, actual: Hash256 },
}
