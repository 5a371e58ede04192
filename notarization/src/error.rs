use thiserror::Error;
use xbridge_governance::GovernanceError;
use xbridge_types::{Hash256, PublicKey, TypesError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("signer {0} is not a registered notary")]
    UnauthorizedSigner(PublicKey),

    #[error("signature from {0} does not verify over the proposed record")]
    InvalidSignature(PublicKey),

    #[error("attested source {txid}:{vout} does not match the proposed record")]
    SourceMismatch { txid: Hash256, vout: u32 },

    #[error("proposed height {height} does not advance past canonical height {canonical}")]
    StaleProposal { height: u32, canonical: u32 },

    #[error("best-fork slot {slot} outside ring of {len}")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("best-fork slot {0} has not been filled")]
    SlotEmpty(usize),

    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] TypesError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),
}
