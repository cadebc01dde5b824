use proptest::prelude::*;

use village_types::{AccessCode, Email, Timestamp};

proptest! {
    /// Email canonicalisation is idempotent.
    #[test]
    fn email_canonical_form_is_stable(raw in "[ -~]{0,40}") {
        let once = Email::new(&raw);
        let twice = Email::new(once.as_str());
        prop_assert_eq!(once, twice);
    }

    /// Emails differing only in ASCII case compare equal.
    #[test]
    fn email_case_insensitive(local in "[a-zA-Z0-9]{1,12}", domain in "[a-zA-Z]{1,10}") {
        let lower = Email::new(format!("{}@{}.com", local.to_lowercase(), domain.to_lowercase()));
        let upper = Email::new(format!("{}@{}.COM", local.to_uppercase(), domain.to_uppercase()));
        prop_assert_eq!(lower, upper);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp elapsed_since saturates to 0 when now < self.
    #[test]
    fn timestamp_elapsed_since_saturates(base in 1u64..1_000_000, deficit in 1u64..1_000_000) {
        let later = Timestamp::new(base + deficit);
        let earlier = Timestamp::new(base);
        prop_assert_eq!(later.elapsed_since(earlier), 0);
        prop_assert_eq!(earlier.elapsed_since(later), deficit);
    }

    /// Timestamp bincode serialization roundtrip.
    #[test]
    fn timestamp_bincode_roundtrip(ms in 0u64..u64::MAX) {
        let ts = Timestamp::new(ms);
        let encoded = bincode::serialize(&ts).unwrap();
        let decoded: Timestamp = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, ts);
    }

    /// The masked form never reveals more than two characters of the suffix.
    #[test]
    fn masked_code_length_preserved(suffix in "[A-Z2-9]{6}") {
        let code = AccessCode::new(format!("YC25-{suffix}"));
        let masked = code.masked();
        prop_assert_eq!(masked.len(), code.as_str().len());
        prop_assert!(masked.ends_with("****"));
    }
}
