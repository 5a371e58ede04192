//! Governance proposals and the contract table they can replace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xbridge_crypto::blake2b_256_multi;
use xbridge_types::{CurrencyId, Hash256, NotarySet};

/// Domain tag mixed into every proposal hash so it can never collide with
/// a notarization record hash.
const PROPOSAL_DOMAIN: &[u8] = b"xbridge/governance-proposal/v1";

const TAG_REPLACE_NOTARY_SET: u8 = 1;
const TAG_UPGRADE_CONTRACTS: u8 = 2;

/// Component name → deployed address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractTable {
    entries: BTreeMap<String, CurrencyId>,
}

impl ContractTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, address: CurrencyId) -> Self {
        self.entries.insert(name.into(), address);
        self
    }

    pub fn get(&self, name: &str) -> Option<CurrencyId> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CurrencyId)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Canonical encoding: u32le count, then per entry (sorted by name)
    /// u32le name length, name bytes, 20-byte address.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        for (name, address) in &self.entries {
            out.extend_from_slice(&(name.len() as u32).to_le_bytes());
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(address.as_bytes());
        }
        out
    }
}

impl FromIterator<(String, CurrencyId)> for ContractTable {
    fn from_iter<I: IntoIterator<Item = (String, CurrencyId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A change the governance vote can authorise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proposal {
    ReplaceNotarySet(NotarySet),
    UpgradeContracts(ContractTable),
}

impl Proposal {
    /// The hash voters cast for this proposal.
    pub fn hash(&self) -> Hash256 {
        let (tag, body) = match self {
            Proposal::ReplaceNotarySet(set) => (TAG_REPLACE_NOTARY_SET, set.to_bytes()),
            Proposal::UpgradeContracts(table) => (TAG_UPGRADE_CONTRACTS, table.to_bytes()),
        };
        blake2b_256_multi(&[PROPOSAL_DOMAIN, &[tag], &body])
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Proposal::ReplaceNotarySet(_) => "replace-notary-set",
            Proposal::UpgradeContracts(_) => "upgrade-contracts",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_table_encoding_is_order_independent() {
        let a = ContractTable::new()
            .with("verifier", CurrencyId::new([1; 20]))
            .with("ledger", CurrencyId::new([2; 20]));
        let b = ContractTable::new()
            .with("ledger", CurrencyId::new([2; 20]))
            .with("verifier", CurrencyId::new([1; 20]));
        assert_eq!(a.to_bytes(), b.to_bytes());
        assert_eq!(
            Proposal::UpgradeContracts(a).hash(),
            Proposal::UpgradeContracts(b).hash()
        );
    }

    #[test]
    fn hash_depends_on_content() {
        let a = Proposal::UpgradeContracts(ContractTable::new().with("x", CurrencyId::new([1; 20])));
        let b = Proposal::UpgradeContracts(ContractTable::new().with("x", CurrencyId::new([2; 20])));
        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.kind(), "upgrade-contracts");
    }
}
