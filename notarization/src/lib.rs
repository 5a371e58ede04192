//! Notarization consensus for the bridge.
//!
//! Registered notaries sign records describing source-chain state. The
//! ledger tallies their attestations, promotes a record to canonical once a
//! quorum of notaries agree on its hash, and keeps a fixed ring of recent
//! canonical records whose state roots import proofs are checked against.

pub mod error;
pub mod ledger;
pub mod record;

pub use error::LedgerError;
pub use ledger::{AttestationOutcome, BestFork, NotarizationLedger};
pub use record::{Attestation, NotarizationRecord, NotarizationTotals};
