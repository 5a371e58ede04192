use thiserror::Error;
use xbridge_codec::CodecError;
use xbridge_proof::ProofError;
use xbridge_types::{CurrencyId, Hash256, TypesError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettlementError {
    #[error("proof invalid: {0}")]
    ProofInvalid(#[from] ProofError),

    #[error("notarization {0} is unknown or beyond the retention window")]
    StaleNotarization(Hash256),

    #[error("malformed wire data: {0}")]
    MalformedWireData(#[from] CodecError),

    #[error("proof carries {0} output components, expected exactly one export commitment")]
    ExportCommitmentCount(usize),

    #[error("export commitment does not match the submitted transfers")]
    CommitmentMismatch,

    #[error("export commitment is for system {actual}, expected {expected}")]
    WrongSourceSystem {
        expected: CurrencyId,
        actual: CurrencyId,
    },

    #[error("output index overflow at transfer {0}")]
    OutputIndexOverflow(usize),

    #[error("height {height} does not advance past {floor}")]
    HeightRegression { height: u32, floor: u32 },

    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] TypesError),
}
