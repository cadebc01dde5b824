//! Verification orchestration: duplicate checks, scoring, account creation.

use std::sync::Arc;

use tracing::{info, warn};
use village_store::account::{AccountRecord, AccountStore};
use village_store::StoreError;
use village_types::{Email, Timestamp};

use crate::access_code::AccessCodeGenerator;
use crate::answer_key::AnswerKey;
use crate::error::VerificationError;
use crate::outcome::{RejectionReason, ScoredAnswer, VerificationOutcome};
use crate::scoring::{AnswerScorer, AnswerScoring};
use crate::submission::Submission;

pub struct VerificationEngine {
    key: Arc<AnswerKey>,
    scorer: Arc<dyn AnswerScoring>,
    codes: AccessCodeGenerator,
    accounts: Arc<dyn AccountStore + Send + Sync>,
}

impl VerificationEngine {
    pub fn new(
        key: Arc<AnswerKey>,
        accounts: Arc<dyn AccountStore + Send + Sync>,
        codes: AccessCodeGenerator,
    ) -> Self {
        Self {
            key,
            scorer: Arc::new(AnswerScorer),
            codes,
            accounts,
        }
    }

    /// Replace the answer scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn AnswerScoring>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.key
    }

    /// Score every question in key order. Awards are clamped to each
    /// question's maximum.
    pub fn score(&self, submission: &Submission) -> Vec<ScoredAnswer> {
        self.key
            .entries()
            .iter()
            .map(|entry| {
                let awarded = self
                    .scorer
                    .score(submission.answer(entry.question), &entry.answer, entry.max_points)
                    .min(entry.max_points);
                ScoredAnswer {
                    question: entry.question,
                    awarded,
                    max_points: entry.max_points,
                }
            })
            .collect()
    }

    /// Run one verification attempt.
    ///
    /// Duplicate email or profile URL short-circuits with a zero-score
    /// outcome before anything is scored. A passing submission mints a code
    /// and inserts the account; that insert is the only write. A uniqueness
    /// failure on the insert is returned as
    /// [`VerificationError::CreationConflict`].
    pub fn verify(
        &self,
        submission: &Submission,
        now: Timestamp,
    ) -> Result<VerificationOutcome, VerificationError> {
        let email = Email::new(&submission.email);
        let identity_url = submission.identity_url.as_str();

        if self.accounts.find_by_email(&email)?.is_some() {
            info!(email = %email, "verification rejected: email already registered");
            return Ok(VerificationOutcome::rejected(RejectionReason::EmailRegistered));
        }
        if self.accounts.find_by_identity_url(identity_url)?.is_some() {
            info!(identity_url, "verification rejected: profile already registered");
            return Ok(VerificationOutcome::rejected(
                RejectionReason::IdentityRegistered,
            ));
        }

        let mut outcome = VerificationOutcome::scored(self.score(submission));

        if outcome.passed {
            let code = self.codes.generate();
            let record =
                AccountRecord::new_verified(email.clone(), identity_url, code.clone(), now);
            match self.accounts.insert(&record) {
                Ok(stored) => {
                    outcome.account_id = Some(stored.id);
                    outcome.access_code = Some(code);
                }
                Err(StoreError::Duplicate { key, .. }) => {
                    warn!(email = %email, key = key.as_str(), "account creation lost a race");
                    return Err(VerificationError::CreationConflict { key: key.as_str() });
                }
                Err(e) => return Err(e.into()),
            }
        }

        let breakdown: Vec<(&str, u32, u32)> = outcome
            .breakdown
            .iter()
            .map(|s| (s.question.field_name(), s.awarded, s.max_points))
            .collect();
        info!(
            email = %email,
            identity_url,
            score = outcome.total_score,
            passed = outcome.passed,
            risk = outcome.risk_level.as_str(),
            code = ?outcome.access_code,
            breakdown = ?breakdown,
            "verification attempt"
        );

        Ok(outcome)
    }
}
