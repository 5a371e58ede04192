#![no_main]

use libfuzzer_sys::fuzz_target;
use xbridge_codec::{ExportCommitment, ReserveTransfer};
use xbridge_proof::PartialTransactionProof;

// Commitment parsing and bincode deserialization of the relayed types never
// panic on malformed input.
fuzz_target!(|data: &[u8]| {
    if let Ok(c) = ExportCommitment::from_bytes(data) {
        assert_eq!(c.to_bytes().as_slice(), data);
    }
    let _ = bincode::deserialize::<ReserveTransfer>(data);
    let _ = bincode::deserialize::<PartialTransactionProof>(data);
});
