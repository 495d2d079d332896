use proptest::prelude::*;

use flash_types::{AccountId, Timestamp};

proptest! {
    /// AccountId text form parses back to the same bytes.
    #[test]
    fn account_id_text_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let id = AccountId::new(bytes);
        let parsed: AccountId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// AccountId::is_zero is true only for all-zero bytes.
    #[test]
    fn account_id_is_zero_correct(bytes in prop::array::uniform20(0u8..)) {
        let id = AccountId::new(bytes);
        prop_assert_eq!(id.is_zero(), bytes == [0u8; 20]);
    }

    /// AccountId bincode serialization roundtrip.
    #[test]
    fn account_id_bincode_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let id = AccountId::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: AccountId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// Strings without the 0x prefix never parse.
    #[test]
    fn account_id_requires_prefix(s in "[0-9a-f]{40}") {
        prop_assert!(s.parse::<AccountId>().is_err());
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta.is_before(tb), a < b);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
    }

    /// saturating_add never wraps.
    #[test]
    fn timestamp_saturating_add(base in 0u64..u64::MAX, secs in 0u64..u64::MAX) {
        let shifted = Timestamp::new(base).saturating_add(secs);
        prop_assert!(shifted.as_secs() >= base);
        prop_assert_eq!(shifted.as_secs(), base.saturating_add(secs));
    }
}
