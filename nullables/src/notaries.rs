//! Seeded notary sets.

use xbridge_crypto::keypair_from_seed;
use xbridge_notarization::{Attestation, LedgerError, NotarizationLedger, NotarizationRecord};
use xbridge_types::{BridgeParams, CurrencyId, KeyPair, NotaryIdentity, NotarySet, TypesError};

/// `n` notaries whose keys derive from the seeds `[1; 32]`, `[2; 32]`, ...
/// and whose identities are `[1; 20]`, `[2; 20]`, ...
pub struct NotaryFixture {
    keys: Vec<KeyPair>,
    set: NotarySet,
}

impl NotaryFixture {
    pub fn new(n: u8) -> Result<Self, TypesError> {
        Self::with_offset(n, 0)
    }

    /// Like [`new`](Self::new) but starting at seed `offset + 1`, for a
    /// disjoint replacement set.
    pub fn with_offset(n: u8, offset: u8) -> Result<Self, TypesError> {
        let keys: Vec<KeyPair> = (1..=n)
            .map(|i| keypair_from_seed(&[offset.wrapping_add(i); 32]))
            .collect();
        let set = NotarySet::new(
            keys.iter()
                .enumerate()
                .map(|(i, k)| {
                    let tag = offset.wrapping_add(i as u8 + 1);
                    NotaryIdentity {
                        identity: CurrencyId::new([tag; 20]),
                        signer: k.public,
                        recovery: keypair_from_seed(&[tag ^ 0xff; 32]).public,
                    }
                })
                .collect(),
        )?;
        Ok(Self { keys, set })
    }

    pub fn set(&self) -> &NotarySet {
        &self.set
    }

    pub fn keys(&self, index: usize) -> Option<&KeyPair> {
        self.keys.get(index)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A ledger over this set.
    pub fn ledger(&self, params: &BridgeParams) -> Result<NotarizationLedger, LedgerError> {
        NotarizationLedger::new(self.set.clone(), params)
    }

    /// Attestations for `record` from the first `count` notaries.
    pub fn attest(&self, record: &NotarizationRecord, count: usize) -> Vec<Attestation> {
        self.keys
            .iter()
            .take(count)
            .map(|k| Attestation::sign(record.clone(), k))
            .collect()
    }

    /// Submit quorum attestations so `record` becomes canonical.
    pub fn promote(
        &self,
        ledger: &mut NotarizationLedger,
        record: &NotarizationRecord,
    ) -> Result<(), LedgerError> {
        for attestation in self.attest(record, ledger.quorum()) {
            ledger.submit_attestation(&attestation)?;
        }
        Ok(())
    }
}
