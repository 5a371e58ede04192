//! Prover-side construction of roots and branches the verifier accepts.
//! Relayers use these to assemble import proofs.

use xbridge_crypto::hash_pair;
use xbridge_types::Hash256;

use crate::branch::{
    bag_peaks, locate_leaf, peak_heights, MerkleBranch, BRANCH_MERKLE, BRANCH_MOUNTAIN_RANGE,
};
use crate::error::ProofError;

/// Root of a binary Merkle tree; odd levels duplicate their last node.
pub fn merkle_root(leaves: &[Hash256]) -> Result<Hash256, ProofError> {
    if leaves.is_empty() {
        return Err(ProofError::EmptyLevel);
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    Ok(level[0])
}

/// Binary branch proving `leaves[index]`.
pub fn merkle_branch(leaves: &[Hash256], index: usize) -> Result<MerkleBranch, ProofError> {
    check_index(leaves, index)?;
    Ok(MerkleBranch {
        branch_type: BRANCH_MERKLE,
        index: index as u64,
        level_size: leaves.len() as u64,
        extra_hashes: 0,
        siblings: path(leaves, index),
        height: 0,
    })
}

/// Root of a Merkle mountain range over `leaves`.
pub fn mmr_root(leaves: &[Hash256]) -> Result<Hash256, ProofError> {
    if leaves.is_empty() {
        return Err(ProofError::EmptyLevel);
    }
    let peaks = mountains(leaves)
        .map(merkle_root)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(bag_peaks(&peaks))
}

/// Mountain-range branch proving `leaves[index]`.
pub fn mmr_branch(leaves: &[Hash256], index: usize) -> Result<MerkleBranch, ProofError> {
    check_index(leaves, index)?;
    let heights = peak_heights(leaves.len() as u64);
    let (own, local) = locate_leaf(&heights, index as u64);

    let mut siblings = Vec::new();
    let mut peaks = Vec::with_capacity(heights.len() - 1);
    for (i, mountain) in mountains(leaves).enumerate() {
        if i == own {
            siblings.extend(path(mountain, local as usize));
        } else {
            peaks.push(merkle_root(mountain)?);
        }
    }
    siblings.extend(peaks);

    Ok(MerkleBranch {
        branch_type: BRANCH_MOUNTAIN_RANGE,
        index: index as u64,
        level_size: leaves.len() as u64,
        extra_hashes: (heights.len() - 1) as u32,
        siblings,
        height: 0,
    })
}

fn check_index(leaves: &[Hash256], index: usize) -> Result<(), ProofError> {
    if index >= leaves.len() {
        return Err(ProofError::IndexOutOfRange {
            index: index as u64,
            size: leaves.len() as u64,
        });
    }
    Ok(())
}

/// Leaves split into perfect subtrees, largest first.
fn mountains(leaves: &[Hash256]) -> impl Iterator<Item = &[Hash256]> {
    let mut offset = 0;
    peak_heights(leaves.len() as u64).into_iter().map(move |h| {
        let width = 1usize << h;
        let mountain = &leaves[offset..offset + width];
        offset += width;
        mountain
    })
}

fn next_level(level: &[Hash256]) -> Vec<Hash256> {
    level
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            hash_pair(left, pair.get(1).unwrap_or(left))
        })
        .collect()
}

fn path(leaves: &[Hash256], mut index: usize) -> Vec<Hash256> {
    let mut siblings = Vec::new();
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let sibling = index ^ 1;
        siblings.push(*level.get(sibling).unwrap_or(&level[index]));
        level = next_level(&level);
        index >>= 1;
    }
    siblings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::check_proof;

    fn leaves(n: usize) -> Vec<Hash256> {
        (0..n).map(|i| Hash256::new([i as u8; 32])).collect()
    }

    #[test]
    fn every_leaf_proves_against_root() {
        for n in 1..=13 {
            let ls = leaves(n);
            let root = merkle_root(&ls).unwrap();
            let mmr = mmr_root(&ls).unwrap();
            for i in 0..n {
                let b = merkle_branch(&ls, i).unwrap();
                assert_eq!(check_proof(ls[i], &[b]).unwrap().root, root, "n={n} i={i}");
                let m = mmr_branch(&ls, i).unwrap();
                assert_eq!(check_proof(ls[i], &[m]).unwrap().root, mmr, "mmr n={n} i={i}");
            }
        }
    }

    #[test]
    fn odd_level_duplicates_last() {
        let ls = leaves(3);
        let expected = hash_pair(&hash_pair(&ls[0], &ls[1]), &hash_pair(&ls[2], &ls[2]));
        assert_eq!(merkle_root(&ls).unwrap(), expected);
    }

    #[test]
    fn power_of_two_ranges_match_plain_tree() {
        let ls = leaves(8);
        assert_eq!(mmr_root(&ls).unwrap(), merkle_root(&ls).unwrap());
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(merkle_root(&[]), Err(ProofError::EmptyLevel));
        assert_eq!(mmr_root(&[]), Err(ProofError::EmptyLevel));
        assert!(merkle_branch(&leaves(2), 2).is_err());
    }
}
