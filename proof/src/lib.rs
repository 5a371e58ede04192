//! Inclusion proofs for the bridge.
//!
//! A proof is a chain of typed branches folded from a leaf to a root:
//! binary Merkle branches and Merkle-mountain-range branches, composed into
//! partial transaction proofs that tie revealed transaction components to a
//! notarized state root. Everything here is pure; the caller decides which
//! root to trust.

pub mod branch;
pub mod builder;
pub mod error;
pub mod partial;
pub mod verifier;

pub use branch::{BranchType, MerkleBranch, BRANCH_MERKLE, BRANCH_MOUNTAIN_RANGE};
pub use builder::{merkle_branch, merkle_root, mmr_branch, mmr_root};
pub use error::ProofError;
pub use partial::{
    component_leaf, transaction_id, ComponentProof, ComponentType, PartialTransactionProof, VerifiedTransaction,
    PARTIAL_PROOF_VERSION,
};
pub use verifier::{check_proof, verify_inclusion, ProofOutcome};
