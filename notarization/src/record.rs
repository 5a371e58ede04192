//! Notarization records and attestations.

use serde::{Deserialize, Serialize};
use xbridge_codec::{cursor, CurrencyValueMap};
use xbridge_crypto::{blake2b_256, sign_message, verify_signature};
use xbridge_types::{Hash256, KeyPair, PublicKey, Signature};

/// Per-currency totals a notarization summarises.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarizationTotals {
    pub amounts: CurrencyValueMap,
    pub fees: CurrencyValueMap,
    pub burned: CurrencyValueMap,
}

/// A notary's claim about source-chain state at `height`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarizationRecord {
    pub txid: Hash256,
    pub vout: u32,
    pub state_root: Hash256,
    pub height: u32,
    pub totals: NotarizationTotals,
}

impl NotarizationRecord {
    pub fn new(txid: Hash256, vout: u32, state_root: Hash256, height: u32) -> Self {
        Self {
            txid,
            vout,
            state_root,
            height,
            totals: NotarizationTotals::default(),
        }
    }

    /// Canonical encoding. Totals are always written in the multi-value
    /// form so the hash does not depend on how a map was built.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(72);
        cursor::write_hash(&mut out, &self.txid);
        cursor::write_u32_le(&mut out, self.vout);
        cursor::write_hash(&mut out, &self.state_root);
        cursor::write_u32_le(&mut out, self.height);
        for map in [&self.totals.amounts, &self.totals.fees, &self.totals.burned] {
            cursor::write_compact_size(&mut out, map.len() as u64);
            for (id, amount) in map.iter() {
                cursor::write_id(&mut out, id);
                cursor::write_u64_le(&mut out, amount);
            }
        }
        out
    }

    /// The hash notaries sign and vote for.
    pub fn hash(&self) -> Hash256 {
        blake2b_256(&self.to_bytes())
    }
}

/// A signed claim that `record` is the state at the given source output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub signer: PublicKey,
    pub record: NotarizationRecord,
    pub source_txid: Hash256,
    pub source_vout: u32,
    pub signature: Signature,
}

impl Attestation {
    /// Sign `record` with `keys`, attesting to the record's own source.
    pub fn sign(record: NotarizationRecord, keys: &KeyPair) -> Self {
        let signature = sign_message(record.hash().as_bytes(), &keys.private);
        Self {
            signer: keys.public,
            source_txid: record.txid,
            source_vout: record.vout,
            record,
            signature,
        }
    }

    pub fn verify(&self) -> bool {
        verify_signature(self.record.hash().as_bytes(), &self.signature, &self.signer)
    }
}
