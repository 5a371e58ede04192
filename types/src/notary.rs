//! The registered notary set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::TypesError;
use crate::hash::CurrencyId;
use crate::keys::PublicKey;

/// One notary: its source-chain identity plus the host-side keys it signs
/// attestations with and recovers with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotaryIdentity {
    pub identity: CurrencyId,
    pub signer: PublicKey,
    pub recovery: PublicKey,
}

/// An ordered, validated set of notaries.
///
/// Order matters: a notary's position is its index in attestation
/// bookkeeping, and the canonical encoding (and therefore the governance
/// proposal hash) depends on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NotaryIdentity>", into = "Vec<NotaryIdentity>")]
pub struct NotarySet {
    notaries: Vec<NotaryIdentity>,
}

impl NotarySet {
    /// Build a set from parallel identity / signer / recovery tables.
    pub fn from_tables(
        identities: &[CurrencyId],
        signers: &[PublicKey],
        recoveries: &[PublicKey],
    ) -> Result<Self, TypesError> {
        if identities.len() != signers.len() || identities.len() != recoveries.len() {
            return Err(TypesError::InvalidNotarySet(format!(
                "table lengths differ: {} identities, {} signers, {} recovery keys",
                identities.len(),
                signers.len(),
                recoveries.len()
            )));
        }
        let notaries = identities
            .iter()
            .zip(signers)
            .zip(recoveries)
            .map(|((identity, signer), recovery)| NotaryIdentity {
                identity: *identity,
                signer: *signer,
                recovery: *recovery,
            })
            .collect();
        Self::new(notaries)
    }

    /// Validate and wrap a list of notaries. Identities and signer keys must
    /// be unique and the set must not be empty.
    pub fn new(notaries: Vec<NotaryIdentity>) -> Result<Self, TypesError> {
        if notaries.is_empty() {
            return Err(TypesError::InvalidNotarySet("notary set is empty".into()));
        }
        let mut identities = HashSet::new();
        let mut signers = HashSet::new();
        for n in &notaries {
            if !identities.insert(n.identity) {
                return Err(TypesError::InvalidNotarySet(format!(
                    "duplicate identity {}",
                    n.identity
                )));
            }
            if !signers.insert(n.signer) {
                return Err(TypesError::InvalidNotarySet(format!(
                    "duplicate signer {}",
                    n.signer
                )));
            }
        }
        Ok(Self { notaries })
    }

    pub fn len(&self) -> usize {
        self.notaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notaries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotaryIdentity> {
        self.notaries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&NotaryIdentity> {
        self.notaries.get(index)
    }

    /// Position of the notary whose signer key is `signer`.
    pub fn index_of_signer(&self, signer: &PublicKey) -> Option<usize> {
        self.notaries.iter().position(|n| &n.signer == signer)
    }

    /// Canonical byte encoding: `u32le count` then `identity ‖ signer ‖ recovery`
    /// per notary.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.notaries.len() * 84);
        out.extend_from_slice(&(self.notaries.len() as u32).to_le_bytes());
        for n in &self.notaries {
            out.extend_from_slice(n.identity.as_bytes());
            out.extend_from_slice(n.signer.as_bytes());
            out.extend_from_slice(n.recovery.as_bytes());
        }
        out
    }
}

impl TryFrom<Vec<NotaryIdentity>> for NotarySet {
    type Error = TypesError;

    fn try_from(notaries: Vec<NotaryIdentity>) -> Result<Self, Self::Error> {
        Self::new(notaries)
    }
}

impl From<NotarySet> for Vec<NotaryIdentity> {
    fn from(set: NotarySet) -> Self {
        set.notaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notary(i: u8) -> NotaryIdentity {
        NotaryIdentity {
            identity: CurrencyId::new([i; 20]),
            signer: PublicKey([i; 32]),
            recovery: PublicKey([i.wrapping_add(100); 32]),
        }
    }

    #[test]
    fn rejects_empty_set() {
        assert!(NotarySet::new(vec![]).is_err());
    }

    #[test]
    fn rejects_duplicate_signer() {
        let mut b = notary(2);
        b.signer = notary(1).signer;
        let err = NotarySet::new(vec![notary(1), b]).unwrap_err();
        assert!(matches!(err, TypesError::InvalidNotarySet(_)));
    }

    #[test]
    fn from_tables_requires_equal_lengths() {
        let ids = [CurrencyId::new([1; 20]), CurrencyId::new([2; 20])];
        let keys = [PublicKey([1; 32])];
        assert!(NotarySet::from_tables(&ids, &keys, &keys).is_err());
    }

    #[test]
    fn index_of_signer_follows_order() {
        let set = NotarySet::new(vec![notary(1), notary(2), notary(3)]).unwrap();
        assert_eq!(set.index_of_signer(&PublicKey([3; 32])), Some(2));
        assert_eq!(set.index_of_signer(&PublicKey([9; 32])), None);
    }

    #[test]
    fn encoding_depends_on_order() {
        let a = NotarySet::new(vec![notary(1), notary(2)]).unwrap();
        let b = NotarySet::new(vec![notary(2), notary(1)]).unwrap();
        assert_eq!(a.to_bytes().len(), 4 + 2 * 84);
        assert_ne!(a.to_bytes(), b.to_bytes());
    }
}
