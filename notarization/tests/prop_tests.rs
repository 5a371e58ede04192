use proptest::prelude::*;

use xbridge_crypto::keypair_from_seed;
use xbridge_notarization::{
    Attestation, AttestationOutcome, LedgerError, NotarizationLedger, NotarizationRecord,
};
use xbridge_types::{
    BridgeParams, CurrencyId, Hash256, KeyPair, NotaryIdentity, NotarySet, QuorumPolicy,
};

fn keys(n: u8) -> Vec<KeyPair> {
    (1..=n).map(|i| keypair_from_seed(&[i; 32])).collect()
}

fn ledger(keys: &[KeyPair], quorum: QuorumPolicy) -> NotarizationLedger {
    let set = NotarySet::new(
        keys.iter()
            .enumerate()
            .map(|(i, k)| NotaryIdentity {
                identity: CurrencyId::new([i as u8 + 1; 20]),
                signer: k.public,
                recovery: k.public,
            })
            .collect(),
    )
    .unwrap();
    let params = BridgeParams {
        quorum,
        ..BridgeParams::testnet_defaults()
    };
    NotarizationLedger::new(set, &params).unwrap()
}

fn record(height: u32) -> NotarizationRecord {
    NotarizationRecord::new(Hash256::new([7; 32]), 0, Hash256::new([height as u8; 32]), height)
}

/// Three notaries, quorum two: the repeat attestation from the first signer
/// is counted once, and the record is promoted with exactly two votes.
#[test]
fn three_notaries_quorum_two() {
    let ks = keys(3);
    let mut ledger = ledger(&ks, QuorumPolicy::Fixed(2));
    let r = record(50);
    let hash = r.hash();

    ledger.submit_attestation(&Attestation::sign(r.clone(), &ks[0])).unwrap();
    ledger.submit_attestation(&Attestation::sign(r.clone(), &ks[0])).unwrap();
    assert_eq!(ledger.get_vote_count(&hash), 1);

    let outcome = ledger.submit_attestation(&Attestation::sign(r.clone(), &ks[1])).unwrap();
    assert_eq!(outcome, AttestationOutcome::Promoted { hash, votes: 2 });
    assert_eq!(ledger.canonical(), Some(&r));
}

/// Before promotion, two distinct signers plus a repeat yield a count of two.
#[test]
fn repeat_attestation_never_double_counts() {
    let ks = keys(3);
    let mut ledger = ledger(&ks, QuorumPolicy::Fixed(3));
    let r = record(50);
    for k in [&ks[0], &ks[1], &ks[0]] {
        ledger.submit_attestation(&Attestation::sign(r.clone(), k)).unwrap();
    }
    assert_eq!(ledger.get_vote_count(&r.hash()), 2);
}

#[test]
fn unregistered_signer_rejected() {
    let ks = keys(3);
    let mut ledger = ledger(&ks, QuorumPolicy::Majority);
    let stranger = keypair_from_seed(&[42; 32]);
    assert_eq!(
        ledger.submit_attestation(&Attestation::sign(record(1), &stranger)),
        Err(LedgerError::UnauthorizedSigner(stranger.public))
    );
}

proptest! {
    /// Whatever the order of attestations, a hash's count is the number of
    /// distinct signers whose latest vote is for it. Only four of five
    /// notaries vote, so the quorum of five is never reached.
    #[test]
    fn count_matches_latest_votes(
        votes in prop::collection::vec((0usize..4, 0u32..3), 1..40),
    ) {
        let ks = keys(5);
        let mut ledger = ledger(&ks, QuorumPolicy::Fixed(5));
        let mut last: Vec<Option<u32>> = vec![None; 4];
        for (signer, choice) in votes {
            let r = record(100 + choice);
            ledger.submit_attestation(&Attestation::sign(r, &ks[signer])).unwrap();
            last[signer] = Some(choice);
            for c in 0..3 {
                let expected = last.iter().filter(|v| **v == Some(c)).count();
                prop_assert_eq!(ledger.get_vote_count(&record(100 + c).hash()), expected);
            }
        }
    }
}
