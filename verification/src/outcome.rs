//! Result of one verification attempt.

use serde::{Deserialize, Serialize};
use village_types::{AccessCode, AccountId};

use crate::answer_key::{QuestionId, TOTAL_POINTS};

/// Minimum total score that passes.
pub const PASS_THRESHOLD: u32 = 70;

/// Minimum total score rated low risk.
pub const LOW_RISK_THRESHOLD: u32 = 85;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= LOW_RISK_THRESHOLD {
            RiskLevel::Low
        } else if score >= PASS_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredAnswer {
    pub question: QuestionId,
    pub awarded: u32,
    pub max_points: u32,
}

/// Why a submission was turned away before scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    EmailRegistered,
    IdentityRegistered,
}

impl RejectionReason {
    /// Short machine-facing error string.
    pub fn error_message(&self) -> &'static str {
        match self {
            RejectionReason::EmailRegistered => "Email already registered",
            RejectionReason::IdentityRegistered => "LinkedIn profile already registered",
        }
    }

    pub fn reasoning(&self) -> &'static str {
        match self {
            RejectionReason::EmailRegistered => {
                "This email address has already been used to create an account. \
                 Each person can only have one account."
            }
            RejectionReason::IdentityRegistered => {
                "This LinkedIn profile has already been used to create an account. \
                 Each person can only have one account."
            }
        }
    }
}

const PASS_REASONING: &str = "You've demonstrated knowledge of YC AI Startup School details \
     that only attendees would know. Welcome to the community!";

const FAIL_REASONING: &str = "Some answers didn't match the official YC event information. \
     Please double-check your YC event materials and try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub total_score: u32,
    pub passed: bool,
    pub risk_level: RiskLevel,
    /// Present iff `passed`.
    pub access_code: Option<AccessCode>,
    /// Id of the account created for a passing submission.
    pub account_id: Option<AccountId>,
    /// Empty when the submission was rejected before scoring.
    pub breakdown: Vec<ScoredAnswer>,
    pub rejection: Option<RejectionReason>,
}

impl VerificationOutcome {
    pub(crate) fn rejected(reason: RejectionReason) -> Self {
        Self {
            total_score: 0,
            passed: false,
            risk_level: RiskLevel::High,
            access_code: None,
            account_id: None,
            breakdown: Vec::new(),
            rejection: Some(reason),
        }
    }

    /// Outcome for a scored submission; no account is attached yet.
    pub(crate) fn scored(breakdown: Vec<ScoredAnswer>) -> Self {
        let total_score = breakdown.iter().map(|s| s.awarded).sum();
        Self {
            total_score,
            passed: total_score >= PASS_THRESHOLD,
            risk_level: RiskLevel::from_score(total_score),
            access_code: None,
            account_id: None,
            breakdown,
            rejection: None,
        }
    }

    /// Text shown to the user alongside the score.
    pub fn reasoning(&self) -> String {
        if let Some(reason) = self.rejection {
            return reason.reasoning().to_string();
        }
        let verdict = if self.passed {
            PASS_REASONING
        } else {
            FAIL_REASONING
        };
        format!(
            "Verification completed with {}/{TOTAL_POINTS} points. {verdict}",
            self.total_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(points: &[u32]) -> Vec<ScoredAnswer> {
        points
            .iter()
            .zip(QuestionId::ALL)
            .map(|(&awarded, question)| ScoredAnswer {
                question,
                awarded,
                max_points: 20,
            })
            .collect()
    }

    #[test]
    fn risk_tiers() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(85), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(84), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
    }

    #[test]
    fn threshold_is_inclusive() {
        let pass = VerificationOutcome::scored(breakdown(&[20, 20, 15, 15, 0, 0]));
        assert_eq!(pass.total_score, 70);
        assert!(pass.passed);
        assert_eq!(pass.risk_level, RiskLevel::Medium);

        let fail = VerificationOutcome::scored(breakdown(&[20, 20, 15, 14, 0, 0]));
        assert_eq!(fail.total_score, 69);
        assert!(!fail.passed);
        assert_eq!(fail.risk_level, RiskLevel::High);
    }

    #[test]
    fn reasoning_reports_score() {
        let pass = VerificationOutcome::scored(breakdown(&[20, 20, 20, 20, 20, 0]));
        assert!(pass
            .reasoning()
            .starts_with("Verification completed with 100/100 points. You've demonstrated"));

        let fail = VerificationOutcome::scored(breakdown(&[14, 0, 0, 0, 0, 0]));
        assert!(fail
            .reasoning()
            .starts_with("Verification completed with 14/100 points. Some answers"));
    }

    #[test]
    fn rejection_is_high_risk_with_zero_score() {
        let out = VerificationOutcome::rejected(RejectionReason::IdentityRegistered);
        assert_eq!(out.total_score, 0);
        assert!(!out.passed);
        assert_eq!(out.risk_level, RiskLevel::High);
        assert!(out.reasoning().starts_with("This LinkedIn profile"));
        assert_eq!(
            out.rejection.map(|r| r.error_message()),
            Some("LinkedIn profile already registered")
        );
    }
}
