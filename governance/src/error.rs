use thiserror::Error;
use xbridge_types::Hash256;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("quorum not met for proposal {hash}: {have} < {need} votes")]
    QuorumNotMet {
        hash: Hash256,
        have: usize,
        need: usize,
    },

    #[error("governance threshold {threshold} must be within 1..={buffer_len}")]
    InvalidThreshold { threshold: usize, buffer_len: usize },
}
