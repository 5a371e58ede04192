//! BLAKE2b-256, the single hash primitive used by proofs, notarization
//! records and governance proposals.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use xbridge_types::Hash256;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit BLAKE2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> Hash256 {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    finish(hasher)
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    finish(hasher)
}

/// Interior Merkle node: `H(left ‖ right)`.
pub fn hash_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    blake2b_256_multi(&[left.as_bytes(), right.as_bytes()])
}

fn finish(hasher: Blake2b256) -> Hash256 {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    Hash256::new(output)
}
