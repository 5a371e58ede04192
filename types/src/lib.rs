//! Fundamental types for the xbridge verification and settlement core.
//!
//! Every other crate in the workspace builds on these: fixed-width hashes and
//! chain identifiers, notary key material, the notary set, and the
//! deployment parameters handed to each component at construction.

pub mod error;
pub mod hash;
pub mod keys;
pub mod notary;
pub mod params;

pub use error::TypesError;
pub use hash::{CurrencyId, Hash256};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use notary::{NotaryIdentity, NotarySet};
pub use params::{BridgeParams, QuorumPolicy, StaleVotePolicy};
