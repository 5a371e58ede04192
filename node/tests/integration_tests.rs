//! End-to-end tests: a bridge core loaded from a TOML file on disk,
//! notarizing a source state, settling an export against it, and rotating
//! its notary set through governance.

use xbridge_codec::{CurrencyValueMap, ReserveTransfer, TransferDestination};
use xbridge_governance::{ContractTable, GovernanceError, Proposal};
use xbridge_node::{BridgeConfig, BridgeCore, NodeError, NotaryEntry};
use xbridge_notarization::{Attestation, AttestationOutcome, LedgerError, NotarizationRecord};
use xbridge_nullables::{ExportFixture, NotaryFixture, NullTokenManager};
use xbridge_types::{BridgeParams, CurrencyId, Hash256};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SOURCE: CurrencyId = CurrencyId::new([9; 20]);

fn config_for(notaries: &NotaryFixture) -> BridgeConfig {
    BridgeConfig {
        params: BridgeParams {
            source_system_id: SOURCE,
            ..BridgeParams::testnet_defaults()
        },
        notaries: notaries.set().iter().map(NotaryEntry::from_identity).collect(),
        ..BridgeConfig::default()
    }
}

/// Write `config` to a temp file and load a core from it.
fn core_from_disk(config: &BridgeConfig) -> (tempfile::TempDir, BridgeCore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("xbridge.toml");
    std::fs::write(&path, config.to_toml_string().expect("serialize")).expect("write config");
    let loaded = BridgeConfig::from_toml_file(&path).expect("load config");
    assert_eq!(&loaded, config);
    let core = BridgeCore::from_config(&loaded).expect("build core");
    (dir, core)
}

fn transfer(amount: u64) -> ReserveTransfer {
    ReserveTransfer::new(
        CurrencyValueMap::single(CurrencyId::new([1; 20]), amount),
        CurrencyId::new([2; 20]),
        10,
        TransferDestination::eth(CurrencyId::new([3; 20])),
        CurrencyId::new([1; 20]),
    )
}

// ---------------------------------------------------------------------------
// 1. Notarize then import
// ---------------------------------------------------------------------------

#[test]
fn notarized_export_settles_through_core() {
    let notaries = NotaryFixture::new(5).unwrap();
    let (_dir, mut core) = core_from_disk(&config_for(&notaries));
    assert_eq!(core.ledger().quorum(), 3);

    let export = ExportFixture::new(SOURCE)
        .build(vec![transfer(4), transfer(6), transfer(8)])
        .unwrap();
    let record = export.record(120);
    let hash = record.hash();

    let mut outcome = None;
    for attestation in notaries.attest(&record, 3) {
        outcome = Some(core.submit_attestation(&attestation).unwrap());
    }
    assert_eq!(outcome, Some(AttestationOutcome::Promoted { hash, votes: 3 }));

    let mut tokens = NullTokenManager::new();
    let report = core
        .submit_import(&mut tokens, &export.proof, &export.serialized, &hash)
        .unwrap();
    assert_eq!(report.applied(), 3);
    assert_eq!(tokens.applied_keys().len(), 3);
    assert_eq!(core.settlement().imported_count(), 3);
}

#[test]
fn unregistered_signer_cannot_attest() {
    let notaries = NotaryFixture::new(3).unwrap();
    let outsiders = NotaryFixture::with_offset(1, 100).unwrap();
    let (_dir, mut core) = core_from_disk(&config_for(&notaries));

    let record = NotarizationRecord::new(Hash256::new([1; 32]), 0, Hash256::new([2; 32]), 10);
    let attestation = &outsiders.attest(&record, 1)[0];
    assert!(matches!(
        core.submit_attestation(attestation),
        Err(NodeError::Ledger(LedgerError::UnauthorizedSigner(_)))
    ));
}

// ---------------------------------------------------------------------------
// 2. Governance
// ---------------------------------------------------------------------------

#[test]
fn governance_rotates_notary_set() {
    let old = NotaryFixture::new(3).unwrap();
    let new = NotaryFixture::with_offset(4, 50).unwrap();
    let (_dir, mut core) = core_from_disk(&config_for(&old));
    let proposal = Proposal::ReplaceNotarySet(new.set().clone());

    // Testnet threshold is 3 of 5.
    core.cast_governance_vote(&proposal);
    core.cast_governance_vote(&proposal);
    assert!(matches!(
        core.apply_proposal(proposal.clone()),
        Err(NodeError::Ledger(LedgerError::Governance(
            GovernanceError::QuorumNotMet { have: 2, need: 3, .. }
        )))
    ));
    assert_eq!(core.ledger().notaries(), old.set());

    core.cast_governance_vote(&proposal);
    core.apply_proposal(proposal).unwrap();
    assert_eq!(core.ledger().notaries(), new.set());
    assert_eq!(core.ledger().quorum(), 3);

    let record = NotarizationRecord::new(Hash256::new([1; 32]), 0, Hash256::new([2; 32]), 10);
    let from_old: &Attestation = &old.attest(&record, 1)[0];
    assert!(matches!(
        core.submit_attestation(from_old),
        Err(NodeError::Ledger(LedgerError::UnauthorizedSigner(_)))
    ));
    for attestation in new.attest(&record, 3) {
        core.submit_attestation(&attestation).unwrap();
    }
    assert_eq!(core.ledger().canonical(), Some(&record));
}

#[test]
fn governance_upgrades_contracts() {
    let notaries = NotaryFixture::new(3).unwrap();
    let (_dir, mut core) = core_from_disk(&config_for(&notaries));
    let table = ContractTable::new().with("token_manager", CurrencyId::new([0x77; 20]));
    let proposal = Proposal::UpgradeContracts(table.clone());

    for _ in 0..3 {
        core.cast_governance_vote(&proposal);
    }
    core.apply_proposal(proposal).unwrap();
    assert_eq!(core.governance().contracts(), &table);
    assert_eq!(core.governance().applied_count(), 1);
}

// ---------------------------------------------------------------------------
// 3. Export batching through the core
// ---------------------------------------------------------------------------

#[test]
fn outbound_transfers_batch_by_height() {
    let notaries = NotaryFixture::new(3).unwrap();
    let (_dir, mut core) = core_from_disk(&config_for(&notaries));

    core.record_outbound_transfer(10, transfer(1)).unwrap();
    core.record_outbound_transfer(110, transfer(2)).unwrap();
    core.flush(150).unwrap();

    let spans: Vec<_> = core
        .ready_exports(0, u32::MAX)
        .iter()
        .map(|b| (b.start_height, b.end_height, b.len()))
        .collect();
    assert_eq!(spans, vec![(0, 100, 1), (100, 150, 1)]);
}
