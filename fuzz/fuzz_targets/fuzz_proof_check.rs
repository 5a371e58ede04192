#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use xbridge_proof::{check_proof, ComponentProof, MerkleBranch, PartialTransactionProof};
use xbridge_types::Hash256;

fn hash(u: &mut Unstructured<'_>) -> arbitrary::Result<Hash256> {
    Ok(Hash256::new(u.arbitrary()?))
}

fn branch(u: &mut Unstructured<'_>) -> arbitrary::Result<MerkleBranch> {
    let sibling_count = u.int_in_range(0..=70)?;
    Ok(MerkleBranch {
        branch_type: u.int_in_range(0..=3)?,
        index: u64::arbitrary(u)?,
        level_size: u64::arbitrary(u)?,
        extra_hashes: u.int_in_range(0..=64)?,
        siblings: (0..sibling_count)
            .map(|_| hash(u))
            .collect::<arbitrary::Result<_>>()?,
        height: u32::arbitrary(u)?,
    })
}

fn chain(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<MerkleBranch>> {
    let len = u.int_in_range(0..=3)?;
    (0..len).map(|_| branch(u)).collect()
}

fn proof(u: &mut Unstructured<'_>) -> arbitrary::Result<PartialTransactionProof> {
    let components = u.int_in_range(0..=4)?;
    Ok(PartialTransactionProof {
        version: u.int_in_range(0..=2)?,
        tx_proof: chain(u)?,
        components: (0..components)
            .map(|_| {
                Ok(ComponentProof {
                    el_type: u.int_in_range(0..=5)?,
                    el_idx: u32::arbitrary(u)?,
                    el_vch_obj: Vec::arbitrary(u)?,
                    el_proof: chain(u)?,
                })
            })
            .collect::<arbitrary::Result<_>>()?,
    })
}

// Checking arbitrary branch chains and partial proofs never panics.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    if let (Ok(leaf), Ok(chain)) = (hash(&mut u), chain(&mut u)) {
        let _ = check_proof(leaf, &chain);
    }
    if let Ok(p) = proof(&mut u) {
        let _ = p.check();
    }
});
