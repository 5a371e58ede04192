use proptest::prelude::*;

use xbridge_types::{CurrencyId, Hash256, QuorumPolicy};

proptest! {
    /// Hex rendering parses back to the same hash.
    #[test]
    fn hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash256::new(bytes);
        let parsed: Hash256 = hash.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// Hash256::is_zero is true only for all-zero bytes.
    #[test]
    fn hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        prop_assert_eq!(Hash256::new(bytes).is_zero(), bytes == [0u8; 32]);
    }

    /// CurrencyId survives the binary (non human-readable) serde path.
    #[test]
    fn currency_id_bincode_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let id = CurrencyId::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: CurrencyId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// A majority quorum is always reachable and always a strict majority.
    #[test]
    fn majority_is_strict(n in 1usize..200) {
        let k = QuorumPolicy::Majority.threshold(n).unwrap();
        prop_assert!(k <= n);
        prop_assert!(2 * k > n);
    }
}
