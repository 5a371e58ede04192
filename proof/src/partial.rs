//! Partial transaction proofs.
//!
//! A partial proof reveals selected components of a source transaction.
//! Each component's type and raw bytes hash to a leaf of the transaction's
//! component tree. One binary branch folds the leaf to the component root,
//! and the transaction id is a domain-tagged hash of that root. The id then
//! folds through `tx_proof` to the state root a notarization commits to.
//!
//! The verifier derives the id itself, so it does not depend on where the
//! prover splits its branches.

use serde::{Deserialize, Serialize};
use xbridge_crypto::blake2b_256_multi;
use xbridge_types::Hash256;

use crate::branch::{MerkleBranch, BRANCH_MERKLE};
use crate::error::ProofError;
use crate::verifier::check_proof;

pub const PARTIAL_PROOF_VERSION: u32 = 1;

const COMPONENT_DOMAIN: &[u8] = b"xbridge/tx-component/v1";
const TXID_DOMAIN: &[u8] = b"xbridge/txid/v1";

/// Leaf of a transaction's component tree: `H(domain ‖ el_type ‖ obj)`.
pub fn component_leaf(el_type: u8, obj: &[u8]) -> Hash256 {
    blake2b_256_multi(&[COMPONENT_DOMAIN, &[el_type], obj])
}

/// Transaction id committed under a component tree root.
pub fn transaction_id(component_root: &Hash256) -> Hash256 {
    blake2b_256_multi(&[TXID_DOMAIN, component_root.as_bytes()])
}

/// Transaction component kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ComponentType {
    Header = 1,
    Input = 2,
    Output = 3,
    Memo = 4,
}

impl TryFrom<u8> for ComponentType {
    type Error = ProofError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(ComponentType::Header),
            2 => Ok(ComponentType::Input),
            3 => Ok(ComponentType::Output),
            4 => Ok(ComponentType::Memo),
            other => Err(ProofError::InvalidComponentType(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProof {
    pub el_type: u8,
    pub el_idx: u32,
    pub el_vch_obj: Vec<u8>,
    pub el_proof: Vec<MerkleBranch>,
}

impl ComponentProof {
    pub fn leaf(&self) -> Hash256 {
        component_leaf(self.el_type, &self.el_vch_obj)
    }

    /// Fold this component to the transaction id it belongs to.
    fn txid(&self) -> Result<(Hash256, u32), ProofError> {
        ComponentType::try_from(self.el_type)?;
        let branch = match self.el_proof.as_slice() {
            [] => return Err(ProofError::EmptyChain),
            [branch] if branch.branch_type == BRANCH_MERKLE => branch,
            _ => {
                return Err(ProofError::ComponentBranchShape {
                    el_type: self.el_type,
                    branches: self.el_proof.len(),
                })
            }
        };
        if branch.index != u64::from(self.el_idx) {
            return Err(ProofError::ComponentIndexMismatch {
                el_type: self.el_type,
                claimed: self.el_idx,
                proven: branch.index,
            });
        }
        let outcome = check_proof(self.leaf(), &self.el_proof)?;
        Ok((transaction_id(&outcome.root), outcome.height))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialTransactionProof {
    pub version: u32,
    pub tx_proof: Vec<MerkleBranch>,
    pub components: Vec<ComponentProof>,
}

/// The result of checking a partial proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifiedTransaction {
    pub txid: Hash256,
    pub root: Hash256,
    /// Highest source height committed by any branch.
    pub height: u32,
}

impl PartialTransactionProof {
    pub fn check(&self) -> Result<VerifiedTransaction, ProofError> {
        if self.version != PARTIAL_PROOF_VERSION {
            return Err(ProofError::UnsupportedVersion(self.version));
        }
        let (first, rest) = self
            .components
            .split_first()
            .ok_or(ProofError::NoComponents)?;

        let (txid, mut height) = first.txid()?;
        for component in rest {
            let (other, h) = component.txid()?;
            if other != txid {
                return Err(ProofError::ComponentTxidMismatch { first: txid, other });
            }
            height = height.max(h);
        }

        let outcome = check_proof(txid, &self.tx_proof)?;
        Ok(VerifiedTransaction {
            txid,
            root: outcome.root,
            height: height.max(outcome.height),
        })
    }

    pub fn components_of(&self, kind: ComponentType) -> impl Iterator<Item = &ComponentProof> {
        self.components
            .iter()
            .filter(move |c| c.el_type == kind as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{merkle_branch, merkle_root, mmr_branch, mmr_root};

    /// A transaction with four components, one of each type, sitting at
    /// position 2 of a five-transaction block range.
    fn proof() -> (PartialTransactionProof, Hash256, Hash256) {
        let objs: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i; 10 + i as usize]).collect();
        let leaves: Vec<Hash256> = objs
            .iter()
            .enumerate()
            .map(|(i, o)| component_leaf(i as u8 + 1, o))
            .collect();
        let txid = transaction_id(&merkle_root(&leaves).unwrap());

        let mut txs: Vec<Hash256> = (0..5u8).map(|i| Hash256::new([0x40 + i; 32])).collect();
        txs[2] = txid;
        let root = mmr_root(&txs).unwrap();
        let mut tx_branch = mmr_branch(&txs, 2).unwrap();
        tx_branch.height = 120;

        let components = [1u8, 3]
            .iter()
            .map(|&el_type| {
                let idx = el_type as usize - 1;
                ComponentProof {
                    el_type,
                    el_idx: idx as u32,
                    el_vch_obj: objs[idx].clone(),
                    el_proof: vec![merkle_branch(&leaves, idx).unwrap()],
                }
            })
            .collect();

        (
            PartialTransactionProof {
                version: PARTIAL_PROOF_VERSION,
                tx_proof: vec![tx_branch],
                components,
            },
            txid,
            root,
        )
    }

    #[test]
    fn valid_proof_reaches_root() {
        let (p, txid, root) = proof();
        let v = p.check().unwrap();
        assert_eq!(v.txid, txid);
        assert_eq!(v.root, root);
        assert_eq!(v.height, 120);
        assert_eq!(p.components_of(ComponentType::Output).count(), 1);
    }

    #[test]
    fn tampered_object_changes_txid() {
        let (mut p, _, _) = proof();
        p.components[1].el_vch_obj.push(0);
        assert!(matches!(
            p.check(),
            Err(ProofError::ComponentTxidMismatch { .. })
        ));
    }

    #[test]
    fn structural_errors() {
        let (mut p, _, _) = proof();
        p.components[0].el_type = 5;
        assert_eq!(p.check(), Err(ProofError::InvalidComponentType(5)));

        let (mut p, _, _) = proof();
        p.components[0].el_idx = 3;
        assert!(matches!(
            p.check(),
            Err(ProofError::ComponentIndexMismatch { .. })
        ));

        let (mut p, _, _) = proof();
        p.components.clear();
        assert_eq!(p.check(), Err(ProofError::NoComponents));

        let (mut p, _, _) = proof();
        p.tx_proof.clear();
        assert_eq!(p.check(), Err(ProofError::EmptyChain));

        let (mut p, _, _) = proof();
        p.components[0].el_proof.clear();
        assert_eq!(p.check(), Err(ProofError::EmptyChain));

        let (mut p, _, _) = proof();
        p.version = 2;
        assert_eq!(p.check(), Err(ProofError::UnsupportedVersion(2)));
    }

    #[test]
    fn relabelled_component_changes_txid() {
        // Same bytes and position, claimed as an output instead of a memo.
        let (mut p, _, _) = proof();
        let objs: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i; 10 + i as usize]).collect();
        let leaves: Vec<Hash256> = objs
            .iter()
            .enumerate()
            .map(|(i, o)| component_leaf(i as u8 + 1, o))
            .collect();
        p.components[1] = ComponentProof {
            el_type: ComponentType::Output as u8,
            el_idx: 3,
            el_vch_obj: objs[3].clone(),
            el_proof: vec![merkle_branch(&leaves, 3).unwrap()],
        };
        assert!(matches!(
            p.check(),
            Err(ProofError::ComponentTxidMismatch { .. })
        ));

        p.components.remove(0);
        let (_, _, root) = proof();
        assert_ne!(p.check().unwrap().root, root);
    }

    #[test]
    fn txid_does_not_depend_on_chain_split() {
        // Moving the transaction branch into a component chain is refused.
        let (mut p, _, _) = proof();
        let moved = p.tx_proof.remove(0);
        p.components.retain(|c| c.el_type == ComponentType::Output as u8);
        p.components[0].el_proof.push(moved);
        p.tx_proof.push(MerkleBranch {
            branch_type: BRANCH_MERKLE,
            index: 0,
            level_size: 1,
            extra_hashes: 0,
            siblings: Vec::new(),
            height: 0,
        });
        assert_eq!(
            p.check(),
            Err(ProofError::ComponentBranchShape { el_type: 3, branches: 2 })
        );

        // Padding the transaction chain leaves the id unchanged.
        let (mut p, txid, root) = proof();
        p.tx_proof.insert(
            0,
            MerkleBranch {
                branch_type: BRANCH_MERKLE,
                index: 0,
                level_size: 1,
                extra_hashes: 0,
                siblings: Vec::new(),
                height: 0,
            },
        );
        let v = p.check().unwrap();
        assert_eq!((v.txid, v.root), (txid, root));
    }

    #[test]
    fn component_branch_must_be_binary() {
        let (mut p, _, _) = proof();
        p.components[0].el_proof[0].branch_type = crate::branch::BRANCH_MOUNTAIN_RANGE;
        assert!(matches!(
            p.check(),
            Err(ProofError::ComponentBranchShape { el_type: 1, branches: 1 })
        ));
    }
}
