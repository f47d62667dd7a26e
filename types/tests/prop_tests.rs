use proptest::prelude::*;

use hush_types::{Timestamp, VoterAddress, VotingId};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(base in 0u64..1_000_000, dur in 0u64..1_000_000, now in 0u64..3_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.has_expired(dur, Timestamp::new(now)), now >= base + dur);
    }

    /// Any 20 bytes form a valid address, and parsing the rendered form yields it back.
    #[test]
    fn address_from_bytes_parses(bytes in prop::array::uniform20(0u8..)) {
        let addr = VoterAddress::from_bytes(bytes);
        prop_assert_eq!(VoterAddress::parse(addr.as_str()).unwrap(), addr.clone());
        prop_assert_eq!(addr.is_zero(), bytes == [0u8; 20]);
    }

    /// Key bytes sort in creation order.
    #[test]
    fn voting_id_keys_sort_like_ids(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ka = VotingId::new(a).to_key();
        let kb = VotingId::new(b).to_key();
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }
}
