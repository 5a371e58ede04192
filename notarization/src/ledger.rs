//! The notarization ledger.
//!
//! Each registered notary holds at most one slot of the attestation buffer.
//! A new attestation overwrites the signer's own slot, or claims the next
//! vacant slot from the round-robin cursor. When the slots holding a record's hash reach the
//! quorum, the record becomes canonical: it is pushed into slot 0 of the
//! best-fork ring (older entries shift down) and the buffer is reset
//! according to the stale-vote policy.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use xbridge_governance::{GovernanceVoteTracker, Proposal, RollingBuffer};
use xbridge_types::{BridgeParams, Hash256, NotarySet, PublicKey, QuorumPolicy, StaleVotePolicy};

use crate::error::LedgerError;
use crate::record::{Attestation, NotarizationRecord};

/// Result of an accepted attestation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttestationOutcome {
    /// Recorded; the hash now holds `votes` of the `quorum` needed.
    Pending {
        hash: Hash256,
        votes: usize,
        quorum: usize,
    },
    /// The attestation completed the quorum and the record is canonical.
    Promoted { hash: Hash256, votes: usize },
}

/// A canonical record and its hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestFork {
    pub hash: Hash256,
    pub record: NotarizationRecord,
}

pub struct NotarizationLedger {
    notaries: NotarySet,
    quorum_policy: QuorumPolicy,
    quorum: usize,
    buffer_len: Option<usize>,
    stale_votes: StaleVotePolicy,

    votes: RollingBuffer<Hash256>,
    /// Signer → the attestation slot it currently holds.
    slot_of: HashMap<PublicKey, usize>,
    /// Records proposed in the current round, by hash.
    proposals: HashMap<Hash256, NotarizationRecord>,

    best_forks: Box<[Option<BestFork>]>,
    promotions: u64,
}

impl NotarizationLedger {
    pub fn new(notaries: NotarySet, params: &BridgeParams) -> Result<Self, LedgerError> {
        params.validate(notaries.len())?;
        let quorum = params.quorum.threshold(notaries.len())?;
        let len = params.attestation_buffer_len_for(notaries.len());
        Ok(Self {
            quorum_policy: params.quorum,
            quorum,
            buffer_len: params.attestation_buffer_len,
            stale_votes: params.stale_vote_policy,
            votes: RollingBuffer::new(len),
            slot_of: HashMap::new(),
            proposals: HashMap::new(),
            best_forks: vec![None; params.best_fork_slots].into_boxed_slice(),
            promotions: 0,
            notaries,
        })
    }

    pub fn notaries(&self) -> &NotarySet {
        &self.notaries
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Total records promoted since construction.
    pub fn promotions(&self) -> u64 {
        self.promotions
    }

    /// Attestations currently held for `hash`.
    pub fn get_vote_count(&self, hash: &Hash256) -> usize {
        self.votes.count(hash)
    }

    /// The proposed record behind `hash`, if it still holds votes.
    pub fn pending(&self, hash: &Hash256) -> Option<&NotarizationRecord> {
        self.proposals.get(hash)
    }

    pub fn submit_attestation(
        &mut self,
        attestation: &Attestation,
    ) -> Result<AttestationOutcome, LedgerError> {
        let signer = attestation.signer;
        if self.notaries.index_of_signer(&signer).is_none() {
            return Err(LedgerError::UnauthorizedSigner(signer));
        }
        let record = &attestation.record;
        if record.txid != attestation.source_txid || record.vout != attestation.source_vout {
            return Err(LedgerError::SourceMismatch {
                txid: attestation.source_txid,
                vout: attestation.source_vout,
            });
        }
        if !attestation.verify() {
            return Err(LedgerError::InvalidSignature(signer));
        }
        if let Some(best) = self.canonical() {
            if record.height <= best.height {
                return Err(LedgerError::StaleProposal {
                    height: record.height,
                    canonical: best.height,
                });
            }
        }

        let hash = record.hash();
        let slot = self.write_vote(signer, hash);
        self.proposals.entry(hash).or_insert_with(|| record.clone());

        let votes = self.votes.count(&hash);
        debug!(%signer, %hash, slot, votes, quorum = self.quorum, "attestation accepted");
        if votes < self.quorum {
            return Ok(AttestationOutcome::Pending {
                hash,
                votes,
                quorum: self.quorum,
            });
        }
        self.promote(hash);
        Ok(AttestationOutcome::Promoted { hash, votes })
    }

    /// Record `signer`'s vote, overwriting the slot it already holds.
    fn write_vote(&mut self, signer: PublicKey, hash: Hash256) -> usize {
        let slot = match self.slot_of.get(&signer) {
            Some(&slot) => {
                self.votes.set(slot, Some(hash));
                slot
            }
            None => {
                let slot = self.votes.push_vacant(hash);
                self.slot_of.retain(|_, s| *s != slot);
                self.slot_of.insert(signer, slot);
                slot
            }
        };
        let votes = &self.votes;
        self.proposals.retain(|h, _| votes.count(h) > 0);
        slot
    }

    fn promote(&mut self, hash: Hash256) {
        let Some(record) = self.proposals.remove(&hash) else {
            warn!(%hash, "quorum reached for unknown record");
            return;
        };
        let height = record.height;
        self.best_forks.rotate_right(1);
        self.best_forks[0] = Some(BestFork { hash, record });
        self.promotions += 1;

        match self.stale_votes {
            StaleVotePolicy::Clear => {
                self.votes.reset();
                self.slot_of.clear();
                self.proposals.clear();
            }
            StaleVotePolicy::Persist => {
                self.votes.remove_all(&hash);
                let votes = &self.votes;
                self.slot_of.retain(|_, slot| votes.get(*slot).is_some());
                // Survivors at or below the new canonical height can never win.
                self.proposals.retain(|_, r| r.height > height);
            }
        }
        info!(%hash, height, promotions = self.promotions, "notarization promoted to best fork");
    }

    /// The newest canonical record.
    pub fn canonical(&self) -> Option<&NotarizationRecord> {
        self.best_forks[0].as_ref().map(|b| &b.record)
    }

    /// Canonical record `slot` promotions ago; slot 0 is the newest.
    pub fn get_best_fork(&self, slot: usize) -> Result<&NotarizationRecord, LedgerError> {
        match self.best_forks.get(slot) {
            None => Err(LedgerError::SlotOutOfRange {
                slot,
                len: self.best_forks.len(),
            }),
            Some(None) => Err(LedgerError::SlotEmpty(slot)),
            Some(Some(best)) => Ok(&best.record),
        }
    }

    /// Ring slot and record of a canonical record, by its hash.
    pub fn find_best_fork(&self, hash: &Hash256) -> Option<(usize, &NotarizationRecord)> {
        self.best_forks.iter().enumerate().find_map(|(slot, entry)| {
            entry
                .as_ref()
                .filter(|b| b.hash == *hash)
                .map(|b| (slot, &b.record))
        })
    }

    pub fn best_fork_slots(&self) -> usize {
        self.best_forks.len()
    }

    /// Replace the notary set once governance has voted for it. In-flight
    /// attestations are discarded; canonical records are kept.
    pub fn replace_notary_set(
        &mut self,
        governance: &mut GovernanceVoteTracker,
        notaries: NotarySet,
    ) -> Result<(), LedgerError> {
        let quorum = self.quorum_policy.threshold(notaries.len())?;
        let len = self.buffer_len.unwrap_or(notaries.len());
        if len < notaries.len() {
            return Err(LedgerError::InvalidParams(
                xbridge_types::TypesError::InvalidParams(format!(
                    "attestation buffer ({len}) shorter than notary set ({})",
                    notaries.len()
                )),
            ));
        }
        governance.apply_proposal(&Proposal::ReplaceNotarySet(notaries.clone()))?;

        info!(
            old = self.notaries.len(),
            new = notaries.len(),
            quorum,
            "notary set replaced"
        );
        self.notaries = notaries;
        self.quorum = quorum;
        self.votes = RollingBuffer::new(len);
        self.slot_of.clear();
        self.proposals.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbridge_crypto::keypair_from_seed;
    use xbridge_governance::ContractTable;
    use xbridge_types::{CurrencyId, KeyPair, NotaryIdentity};

    fn keys(n: u8) -> Vec<KeyPair> {
        (1..=n).map(|i| keypair_from_seed(&[i; 32])).collect()
    }

    fn set(keys: &[KeyPair]) -> NotarySet {
        NotarySet::new(
            keys.iter()
                .enumerate()
                .map(|(i, k)| NotaryIdentity {
                    identity: CurrencyId::new([i as u8 + 1; 20]),
                    signer: k.public,
                    recovery: k.public,
                })
                .collect(),
        )
        .unwrap()
    }

    fn params(quorum: QuorumPolicy, stale: StaleVotePolicy) -> BridgeParams {
        BridgeParams {
            quorum,
            stale_vote_policy: stale,
            ..BridgeParams::testnet_defaults()
        }
    }

    fn record(height: u32) -> NotarizationRecord {
        NotarizationRecord::new(
            Hash256::new([height as u8; 32]),
            1,
            Hash256::new([0xAA; 32]),
            height,
        )
    }

    #[test]
    fn repeat_signer_counted_once() {
        let ks = keys(3);
        let mut ledger =
            NotarizationLedger::new(set(&ks), &params(QuorumPolicy::Fixed(2), StaleVotePolicy::Clear))
                .unwrap();
        let r = record(10);
        let hash = r.hash();

        let first = ledger.submit_attestation(&Attestation::sign(r.clone(), &ks[0])).unwrap();
        assert_eq!(first, AttestationOutcome::Pending { hash, votes: 1, quorum: 2 });
        ledger.submit_attestation(&Attestation::sign(r.clone(), &ks[0])).unwrap();
        assert_eq!(ledger.get_vote_count(&hash), 1);

        let done = ledger.submit_attestation(&Attestation::sign(r.clone(), &ks[1])).unwrap();
        assert_eq!(done, AttestationOutcome::Promoted { hash, votes: 2 });
        assert_eq!(ledger.get_best_fork(0).unwrap(), &r);

        // The round is closed: a late repeat cannot re-open it.
        assert_eq!(
            ledger.submit_attestation(&Attestation::sign(r, &ks[0])),
            Err(LedgerError::StaleProposal { height: 10, canonical: 10 })
        );
    }

    #[test]
    fn unauthorized_and_forged_rejected() {
        let ks = keys(3);
        let mut ledger =
            NotarizationLedger::new(set(&ks), &params(QuorumPolicy::Majority, StaleVotePolicy::Clear))
                .unwrap();
        let outsider = keypair_from_seed(&[99; 32]);
        assert_eq!(
            ledger.submit_attestation(&Attestation::sign(record(5), &outsider)),
            Err(LedgerError::UnauthorizedSigner(outsider.public))
        );

        let mut forged = Attestation::sign(record(5), &ks[0]);
        forged.record.state_root = Hash256::new([0xBB; 32]);
        assert_eq!(
            ledger.submit_attestation(&forged),
            Err(LedgerError::InvalidSignature(ks[0].public))
        );

        let mut moved = Attestation::sign(record(5), &ks[0]);
        moved.source_vout = 9;
        assert!(matches!(
            ledger.submit_attestation(&moved),
            Err(LedgerError::SourceMismatch { vout: 9, .. })
        ));
        assert_eq!(ledger.get_vote_count(&record(5).hash()), 0);
    }

    #[test]
    fn switching_vote_moves_signer_slot() {
        let ks = keys(3);
        let mut ledger =
            NotarizationLedger::new(set(&ks), &params(QuorumPolicy::Fixed(3), StaleVotePolicy::Clear))
                .unwrap();
        let (a, b) = (record(10), record(11));
        ledger.submit_attestation(&Attestation::sign(a.clone(), &ks[0])).unwrap();
        ledger.submit_attestation(&Attestation::sign(b.clone(), &ks[0])).unwrap();
        assert_eq!(ledger.get_vote_count(&a.hash()), 0);
        assert_eq!(ledger.get_vote_count(&b.hash()), 1);
        assert!(ledger.pending(&a.hash()).is_none());
    }

    #[test]
    fn best_fork_ring_shifts_and_bounds() {
        let ks = keys(1);
        let mut ledger =
            NotarizationLedger::new(set(&ks), &params(QuorumPolicy::Majority, StaleVotePolicy::Clear))
                .unwrap();
        assert_eq!(ledger.get_best_fork(0), Err(LedgerError::SlotEmpty(0)));
        for h in 1..=10 {
            ledger.submit_attestation(&Attestation::sign(record(h), &ks[0])).unwrap();
        }
        // testnet ring holds 8 entries.
        assert_eq!(ledger.get_best_fork(0).unwrap().height, 10);
        assert_eq!(ledger.get_best_fork(7).unwrap().height, 3);
        assert_eq!(
            ledger.get_best_fork(8),
            Err(LedgerError::SlotOutOfRange { slot: 8, len: 8 })
        );
        assert_eq!(ledger.find_best_fork(&record(9).hash()).map(|(s, _)| s), Some(1));
        assert_eq!(ledger.find_best_fork(&record(2).hash()), None);
        assert_eq!(ledger.promotions(), 10);
    }

    #[test]
    fn stale_vote_policies() {
        for (policy, survivor_votes) in [(StaleVotePolicy::Clear, 0), (StaleVotePolicy::Persist, 1)] {
            let ks = keys(3);
            let mut ledger =
                NotarizationLedger::new(set(&ks), &params(QuorumPolicy::Fixed(2), policy)).unwrap();
            let (loser, winner) = (record(20), record(10));
            ledger.submit_attestation(&Attestation::sign(loser.clone(), &ks[0])).unwrap();
            ledger.submit_attestation(&Attestation::sign(winner.clone(), &ks[1])).unwrap();
            ledger.submit_attestation(&Attestation::sign(winner, &ks[2])).unwrap();
            assert_eq!(ledger.get_vote_count(&loser.hash()), survivor_votes, "{policy:?}");

            // A persisted vote can still complete the next round.
            if policy == StaleVotePolicy::Persist {
                let out = ledger.submit_attestation(&Attestation::sign(loser.clone(), &ks[1])).unwrap();
                assert_eq!(out, AttestationOutcome::Promoted { hash: loser.hash(), votes: 2 });
            }
        }
    }

    #[test]
    fn notary_rotation_requires_governance() {
        let ks = keys(3);
        let mut ledger =
            NotarizationLedger::new(set(&ks), &params(QuorumPolicy::Majority, StaleVotePolicy::Clear))
                .unwrap();
        let mut gov = GovernanceVoteTracker::new(5, 3, ContractTable::new()).unwrap();
        let next = keys(5);
        let new_set = set(&next);

        assert!(matches!(
            ledger.replace_notary_set(&mut gov, new_set.clone()),
            Err(LedgerError::Governance(_))
        ));
        assert_eq!(ledger.notaries().len(), 3);

        ledger.submit_attestation(&Attestation::sign(record(4), &ks[0])).unwrap();
        let hash = Proposal::ReplaceNotarySet(new_set.clone()).hash();
        for _ in 0..3 {
            gov.cast_vote(hash);
        }
        ledger.replace_notary_set(&mut gov, new_set).unwrap();
        assert_eq!(ledger.notaries().len(), 5);
        assert_eq!(ledger.quorum(), 3);
        assert_eq!(ledger.get_vote_count(&record(4).hash()), 0);
        assert_eq!(gov.get_vote_count(&hash), 0);
    }
}
