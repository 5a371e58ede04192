//! The governance vote tracker.

use tracing::{debug, info};
use xbridge_types::Hash256;

use crate::error::GovernanceError;
use crate::proposal::{ContractTable, Proposal};
use crate::rolling::RollingBuffer;

/// Counts proposal votes in a fixed-length rolling buffer and applies a
/// proposal once enough slots hold its hash.
///
/// Applying a proposal rewinds the buffer and clears every slot, so one
/// majority can never authorise two changes.
#[derive(Clone, Debug)]
pub struct GovernanceVoteTracker {
    votes: RollingBuffer<Hash256>,
    threshold: usize,
    contracts: ContractTable,
    applied: u64,
}

impl GovernanceVoteTracker {
    pub fn new(
        buffer_len: usize,
        threshold: usize,
        contracts: ContractTable,
    ) -> Result<Self, GovernanceError> {
        if buffer_len == 0 || threshold == 0 || threshold > buffer_len {
            return Err(GovernanceError::InvalidThreshold {
                threshold,
                buffer_len,
            });
        }
        Ok(Self {
            votes: RollingBuffer::new(buffer_len),
            threshold,
            contracts,
            applied: 0,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn buffer_len(&self) -> usize {
        self.votes.len()
    }

    pub fn contracts(&self) -> &ContractTable {
        &self.contracts
    }

    /// Number of proposals applied so far.
    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    /// Record a vote in the next slot, overwriting its previous occupant.
    /// Returns the slot written.
    pub fn cast_vote(&mut self, hash: Hash256) -> usize {
        let slot = self.votes.push(hash);
        debug!(%hash, slot, count = self.votes.count(&hash), "governance vote cast");
        slot
    }

    pub fn get_vote_count(&self, hash: &Hash256) -> usize {
        self.votes.count(hash)
    }

    /// Authorise `proposal`. Fails without touching any state when its vote
    /// count is below the threshold. On success the buffer is reset, and an
    /// `UpgradeContracts` proposal replaces the contract table. Notary-set
    /// replacement is carried out by the notarization ledger that called in.
    pub fn apply_proposal(&mut self, proposal: &Proposal) -> Result<(), GovernanceError> {
        let hash = proposal.hash();
        let have = self.votes.count(&hash);
        if have < self.threshold {
            return Err(GovernanceError::QuorumNotMet {
                hash,
                have,
                need: self.threshold,
            });
        }
        if let Proposal::UpgradeContracts(table) = proposal {
            self.contracts = table.clone();
        }
        self.votes.reset();
        self.applied += 1;
        info!(%hash, kind = proposal.kind(), votes = have, "governance proposal applied");
        Ok(())
    }
}
