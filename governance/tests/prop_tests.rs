use proptest::prelude::*;

use xbridge_governance::{ContractTable, GovernanceVoteTracker, Proposal};
use xbridge_types::{CurrencyId, Hash256};

fn proposal(b: u8) -> Proposal {
    Proposal::UpgradeContracts(ContractTable::new().with("ledger", CurrencyId::new([b; 20])))
}

proptest! {
    /// A hash's count only drops when one of its slots is overwritten.
    #[test]
    fn vote_count_monotone_until_overwrite(votes in prop::collection::vec(0u8..4, 1..60), len in 1usize..10) {
        let mut t = GovernanceVoteTracker::new(len, 1, ContractTable::new()).unwrap();
        let hashes: Vec<Hash256> = (0..4).map(|b| proposal(b).hash()).collect();
        let mut occupant: Vec<Option<usize>> = vec![None; len];
        for v in votes {
            let before: Vec<usize> = hashes.iter().map(|h| t.get_vote_count(h)).collect();
            let slot = t.cast_vote(hashes[v as usize]);
            let evicted = occupant[slot].replace(v as usize);
            for (i, h) in hashes.iter().enumerate() {
                let after = t.get_vote_count(h);
                if Some(i) == evicted && i != v as usize {
                    prop_assert_eq!(after + 1, before[i]);
                } else if i == v as usize && evicted != Some(i) {
                    prop_assert_eq!(after, before[i] + 1);
                } else {
                    prop_assert_eq!(after, before[i]);
                }
            }
        }
    }

    /// Counts never exceed the buffer length, and an apply always clears them.
    #[test]
    fn apply_clears_all_counts(votes in prop::collection::vec(0u8..3, 0..30)) {
        let mut t = GovernanceVoteTracker::new(7, 2, ContractTable::new()).unwrap();
        for v in &votes {
            t.cast_vote(proposal(*v).hash());
        }
        let total: usize = (0..3).map(|b| t.get_vote_count(&proposal(b).hash())).sum();
        prop_assert!(total <= 7);
        let winner = (0..3).find(|b| t.get_vote_count(&proposal(*b).hash()) >= 2);
        if let Some(b) = winner {
            t.apply_proposal(&proposal(b)).unwrap();
            for b in 0..3 {
                prop_assert_eq!(t.get_vote_count(&proposal(b).hash()), 0);
            }
        }
    }
}
