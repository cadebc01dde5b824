//! Free-text answer matching with partial credit.

/// Share of the points awarded for a near miss, in tenths.
const PARTIAL_CREDIT_TENTHS: u32 = 7;

/// Characters of the user's answer that must appear in the reference answer
/// to earn partial credit.
const PARTIAL_PREFIX_LEN: usize = 3;

/// Scores one answer against its reference.
///
/// Implementations must return a value in `0..=max_points`.
pub trait AnswerScoring: Send + Sync {
    fn score(&self, user_answer: &str, correct_answer: &str, max_points: u32) -> u32;
}

/// Lowercase, drop everything that is not an ASCII word character or
/// whitespace, then trim.
///
/// Stripping before trimming keeps the result stable under repeated
/// application: `" x!"` becomes `"x"`, not `" x"`.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalised form with all whitespace removed; this is what gets compared.
pub fn compact(raw: &str) -> String {
    normalize(raw).chars().filter(|c| !c.is_whitespace()).collect()
}

/// The production scorer.
///
/// Full credit when the user's answer equals or contains the reference;
/// `floor(max * 0.7)` when the first three characters of a longer-than-two
/// answer appear anywhere in the reference; otherwise nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnswerScorer;

impl AnswerScoring for AnswerScorer {
    fn score(&self, user_answer: &str, correct_answer: &str, max_points: u32) -> u32 {
        let user = compact(user_answer);
        let correct = compact(correct_answer);

        if user.is_empty() {
            return 0;
        }
        // One-way containment: a fragment of the reference ("cor" for
        // "corgi") falls through to partial credit instead of full marks.
        if user == correct || user.contains(&correct) {
            return max_points;
        }
        if user.chars().count() >= PARTIAL_PREFIX_LEN {
            let prefix: String = user.chars().take(PARTIAL_PREFIX_LEN).collect();
            if correct.contains(&prefix) {
                let partial = u64::from(max_points) * u64::from(PARTIAL_CREDIT_TENTHS) / 10;
                return u32::try_from(partial).unwrap_or(max_points);
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(user: &str, correct: &str, max: u32) -> u32 {
        AnswerScorer.score(user, correct, max)
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  Hello, World!  "), "hello world");
        assert_eq!(normalize("50-75"), "5075");
        assert_eq!(normalize("snake_case"), "snake_case");
        assert_eq!(normalize(" x!"), "x");
        assert_eq!(normalize("!?"), "");
    }

    #[test]
    fn compact_removes_inner_whitespace() {
        assert_eq!(compact("1 day  before"), "1daybefore");
        assert_eq!(compact("yc ai-25!"), "ycai25");
    }

    #[test]
    fn exact_match_scores_full() {
        assert_eq!(score("YCAI25", "YCAI25", 20), 20);
    }

    #[test]
    fn case_and_punctuation_ignored() {
        assert_eq!(score("yc ai-25!", "YCAI25", 20), 20);
        assert_eq!(score("CORGI.", "corgi", 20), 20);
        assert_eq!(score("1 Day Before", "1 day before", 10), 10);
    }

    #[test]
    fn containing_the_answer_scores_full() {
        assert_eq!(score("the discount is YCAI25 for everyone", "YCAI25", 20), 20);
        assert_eq!(score("it was 50 - 75 degrees", "50-75", 15), 15);
    }

    #[test]
    fn partial_credit_boundary() {
        assert_eq!(score("cor", "corgi", 20), 14);
        assert_eq!(score("co", "corgi", 20), 0);
        assert_eq!(score("org", "corgi", 20), 14);
        assert_eq!(score("yes", "yes", 15), 15);
        assert_eq!(score("yesterday", "yes", 15), 15);
        assert_eq!(score("1 day", "1 day before", 10), 7);
        assert_eq!(score("yca", "YCAI25", 15), 10);
    }

    #[test]
    fn fragments_of_the_reference_are_not_full_credit() {
        assert_eq!(score("2", "21", 20), 0);
        assert_eq!(score("ye", "yes", 20), 0);
        assert_eq!(score("corg", "corgi", 20), 14);
    }

    #[test]
    fn partial_credit_does_not_overflow() {
        assert_eq!(score("cor", "corgi", u32::MAX), 3_006_477_106);
    }

    #[test]
    fn unrelated_answer_scores_zero() {
        assert_eq!(score("giraffe", "corgi", 20), 0);
        assert_eq!(score("no", "yes", 15), 0);
    }

    #[test]
    fn empty_answer_scores_zero() {
        assert_eq!(score("", "corgi", 20), 0);
        assert_eq!(score("   ", "corgi", 20), 0);
        assert_eq!(score("?!.", "corgi", 20), 0);
    }

    #[test]
    fn short_answers_never_earn_partial_credit() {
        assert_eq!(score("2", "21", 20), 0);
        assert_eq!(score("21", "21", 20), 20);
    }
}
