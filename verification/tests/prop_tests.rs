use std::sync::Arc;

use proptest::prelude::*;

use village_verification::access_code::{AccessCodeGenerator, RandomSource, CODE_ALPHABET};
use village_verification::scoring::{compact, normalize};
use village_verification::{AnswerScorer, AnswerScoring};

struct Fixed(Vec<usize>, std::sync::atomic::AtomicUsize);

impl RandomSource for Fixed {
    fn index(&self, bound: usize) -> usize {
        let i = self.1.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.0[i % self.0.len()] % bound
    }
}

proptest! {
    /// Normalising twice gives the same result as normalising once.
    #[test]
    fn normalize_is_idempotent(raw in "[ -~]{0,64}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Normalised output holds only lowercase word characters and spaces.
    #[test]
    fn normalize_output_charset(raw in "[ -~]{0,64}") {
        let out = normalize(&raw);
        prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == ' '));
        prop_assert_eq!(out.trim(), out.as_str());
    }

    /// Scores never exceed the question's weight.
    #[test]
    fn score_within_bounds(user in "[ -~]{0,32}", correct in "[a-zA-Z0-9 -]{1,16}", max in 0u32..=100) {
        let awarded = AnswerScorer.score(&user, &correct, max);
        prop_assert!(awarded <= max);
        prop_assert!(awarded == 0 || awarded == max || awarded == max * 7 / 10);
    }

    /// An answer always earns full credit against itself.
    #[test]
    fn self_match_is_full_credit(answer in "[a-zA-Z0-9]{1,16}", max in 0u32..=100) {
        prop_assert_eq!(AnswerScorer.score(&answer, &answer, max), max);
    }

    /// Wrapping the reference answer in extra text keeps full credit.
    #[test]
    fn embedded_answer_is_full_credit(pre in "[a-z ]{0,10}", answer in "[a-z0-9]{1,8}", post in "[a-z ]{0,10}") {
        let user = format!("{pre}{answer}{post}");
        prop_assert_eq!(AnswerScorer.score(&user, &answer, 20), 20);
    }

    /// Generated codes have the fixed prefix and six alphabet symbols.
    #[test]
    fn generated_code_format(indices in prop::collection::vec(0usize..1000, 1..12)) {
        let gen = AccessCodeGenerator::new(Arc::new(Fixed(indices, Default::default())));
        let code = gen.generate();
        let body = code.as_str().strip_prefix("YC25-").unwrap();
        prop_assert_eq!(body.len(), 6);
        prop_assert!(body.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        prop_assert!(AccessCodeGenerator::is_well_formed(code.as_str()));
    }

    /// Compact form never contains whitespace.
    #[test]
    fn compact_has_no_whitespace(raw in "[ -~]{0,64}") {
        prop_assert!(!compact(&raw).contains(char::is_whitespace));
    }
}
