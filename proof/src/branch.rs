//! Typed branch elements and the per-branch folding rules.
//!
//! A binary branch proves a leaf of a plain Merkle tree whose odd levels
//! duplicate their last node. A mountain-range branch proves a leaf of a
//! Merkle mountain range: the leaf is folded up to its own peak, then all
//! peaks are bagged right to left into a single root.

use serde::{Deserialize, Serialize};
use xbridge_crypto::hash_pair;
use xbridge_types::Hash256;

use crate::error::ProofError;

pub const BRANCH_MERKLE: u8 = 1;
pub const BRANCH_MOUNTAIN_RANGE: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchType {
    Merkle,
    MountainRange,
}

impl TryFrom<u8> for BranchType {
    type Error = ProofError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            BRANCH_MERKLE => Ok(BranchType::Merkle),
            BRANCH_MOUNTAIN_RANGE => Ok(BranchType::MountainRange),
            other => Err(ProofError::UnknownBranchType(other)),
        }
    }
}

impl From<BranchType> for u8 {
    fn from(t: BranchType) -> u8 {
        match t {
            BranchType::Merkle => BRANCH_MERKLE,
            BranchType::MountainRange => BRANCH_MOUNTAIN_RANGE,
        }
    }
}

/// One step of a branch chain: proves the running hash sits at `index` in
/// a level of `level_size` leaves and yields that level's root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBranch {
    pub branch_type: u8,
    pub index: u64,
    pub level_size: u64,
    pub extra_hashes: u32,
    pub siblings: Vec<Hash256>,
    /// Source-chain height the level root was committed at.
    pub height: u32,
}

impl MerkleBranch {
    /// Fold `leaf` through this branch.
    pub fn fold(&self, leaf: Hash256) -> Result<Hash256, ProofError> {
        if self.level_size == 0 {
            return Err(ProofError::EmptyLevel);
        }
        if self.index >= self.level_size {
            return Err(ProofError::IndexOutOfRange {
                index: self.index,
                size: self.level_size,
            });
        }
        match BranchType::try_from(self.branch_type)? {
            BranchType::Merkle => self.fold_binary(leaf),
            BranchType::MountainRange => self.fold_mountain_range(leaf),
        }
    }

    fn fold_binary(&self, leaf: Hash256) -> Result<Hash256, ProofError> {
        self.expect_extra(0)?;
        self.expect_siblings(tree_depth(self.level_size))?;
        Ok(fold_path(leaf, self.index, &self.siblings))
    }

    fn fold_mountain_range(&self, leaf: Hash256) -> Result<Hash256, ProofError> {
        let peaks = peak_heights(self.level_size);
        self.expect_extra((peaks.len() - 1) as u32)?;

        let (own, local_index) = locate_leaf(&peaks, self.index);
        let mountain = peaks[own] as usize;
        self.expect_siblings(mountain + peaks.len() - 1)?;

        let (path, others) = self.siblings.split_at(mountain);
        let peak = fold_path(leaf, local_index, path);

        let mut bag: Vec<Hash256> = others.to_vec();
        bag.insert(own, peak);
        Ok(bag_peaks(&bag))
    }

    fn expect_extra(&self, expected: u32) -> Result<(), ProofError> {
        if self.extra_hashes != expected {
            return Err(ProofError::ExtraHashesMismatch {
                size: self.level_size,
                expected,
                actual: self.extra_hashes,
            });
        }
        Ok(())
    }

    fn expect_siblings(&self, expected: usize) -> Result<(), ProofError> {
        if self.siblings.len() != expected {
            return Err(ProofError::SiblingCountMismatch {
                size: self.level_size,
                expected,
                actual: self.siblings.len(),
            });
        }
        Ok(())
    }
}

/// ⌈log2 size⌉ for `size ≥ 1`.
pub(crate) fn tree_depth(size: u64) -> usize {
    (u64::BITS - (size - 1).leading_zeros()) as usize
}

/// Mountain heights of a range holding `size` leaves, largest first.
pub(crate) fn peak_heights(size: u64) -> Vec<u32> {
    (0..u64::BITS)
        .rev()
        .filter(|bit| size & (1u64 << bit) != 0)
        .collect()
}

/// Which mountain holds leaf `index`, and the leaf's index inside it.
pub(crate) fn locate_leaf(peaks: &[u32], index: u64) -> (usize, u64) {
    let mut offset = 0u64;
    for (i, height) in peaks.iter().enumerate() {
        let width = 1u64 << height;
        if index < offset + width {
            return (i, index - offset);
        }
        offset += width;
    }
    // Unreachable for index < size; callers check bounds first.
    (peaks.len() - 1, 0)
}

pub(crate) fn fold_path(leaf: Hash256, mut index: u64, siblings: &[Hash256]) -> Hash256 {
    let mut acc = leaf;
    for sibling in siblings {
        acc = if index & 1 == 0 {
            hash_pair(&acc, sibling)
        } else {
            hash_pair(sibling, &acc)
        };
        index >>= 1;
    }
    acc
}

/// Bag peaks right to left: `acc = H(peak_i ‖ acc)`.
pub(crate) fn bag_peaks(peaks: &[Hash256]) -> Hash256 {
    let mut iter = peaks.iter().rev();
    let Some(last) = iter.next() else {
        return Hash256::ZERO;
    };
    iter.fold(*last, |acc, peak| hash_pair(peak, &acc))
}
