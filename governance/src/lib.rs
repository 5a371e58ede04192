//! Governance for the bridge core.
//!
//! Votes are proposal hashes written into a fixed-length rolling buffer;
//! a proposal applies once enough slots hold its hash. Proposals replace the
//! notary set or the table of deployed component addresses.

pub mod error;
pub mod proposal;
pub mod rolling;
pub mod tracker;

pub use error::GovernanceError;
pub use proposal::{ContractTable, Proposal};
pub use rolling::RollingBuffer;
pub use tracker::GovernanceVoteTracker;
