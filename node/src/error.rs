use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("notary {index}: {reason}")]
    InvalidNotary { index: usize, reason: String },

    #[error("contract {name:?}: {reason}")]
    InvalidContract { name: String, reason: String },

    #[error("invalid parameters: {0}")]
    Types(#[from] xbridge_types::TypesError),

    #[error("notarization error: {0}")]
    Ledger(#[from] xbridge_notarization::LedgerError),

    #[error("governance error: {0}")]
    Governance(#[from] xbridge_governance::GovernanceError),

    #[error("settlement error: {0}")]
    Settlement(#[from] xbridge_settlement::SettlementError),
}
