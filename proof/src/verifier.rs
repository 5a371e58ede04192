use serde::{Deserialize, Serialize};
use xbridge_types::Hash256;

use crate::branch::MerkleBranch;
use crate::error::ProofError;

/// Root computed by folding a chain, and the highest source height any of
/// its branches committed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOutcome {
    pub root: Hash256,
    pub height: u32,
}

/// Fold `leaf` through every branch of `chain` in order.
///
/// The verifier only folds; comparing the result against a notarized root
/// is the caller's job. An empty chain proves nothing and is rejected.
pub fn check_proof(leaf: Hash256, chain: &[MerkleBranch]) -> Result<ProofOutcome, ProofError> {
    if chain.is_empty() {
        return Err(ProofError::EmptyChain);
    }
    let mut root = leaf;
    let mut height = 0;
    for branch in chain {
        root = branch.fold(root)?;
        height = height.max(branch.height);
    }
    Ok(ProofOutcome { root, height })
}

/// Fold `leaf` and require the result to equal `expected`.
pub fn verify_inclusion(
    leaf: Hash256,
    chain: &[MerkleBranch],
    expected: &Hash256,
) -> Result<ProofOutcome, ProofError> {
    let outcome = check_proof(leaf, chain)?;
    if outcome.root != *expected {
        return Err(ProofError::RootMismatch {
            expected: *expected,
            actual: outcome.root,
        });
    }
    Ok(outcome)
}
