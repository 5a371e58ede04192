//! Export batching and import settlement for the bridge.
//!
//! Outbound transfers are grouped into height-bounded batches, each sealed
//! with an [`ExportCommitment`](xbridge_codec::ExportCommitment). Inbound
//! exports are checked against a canonical notarization, then applied
//! through a [`TokenManager`] exactly once per source output.

pub mod batch;
pub mod error;
pub mod import;
pub mod manager;
pub mod token;

pub use batch::{BatchTotals, ExportBatch};
pub use error::SettlementError;
pub use import::{ImportOutcome, ImportReport};
pub use manager::ExportImportManager;
pub use token::{ImportKey, TokenManager};
