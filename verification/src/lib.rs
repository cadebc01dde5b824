//! Attendee verification.
//!
//! A visitor proves they attended the event by answering six questions only an
//! attendee would know. Each free-text answer is normalised and matched against
//! a fixed [`AnswerKey`] with partial credit; a total of at least 70 out of 100
//! passes. Passing mints an [`AccessCode`](village_types::AccessCode) and
//! creates the account in a single conditional insert.
//!
//! The access code is the only credential the service knows about.
//! [`SessionResolver`] maps a presented code back to its account.

pub mod access_code;
pub mod answer_key;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod scoring;
pub mod session;
pub mod submission;

pub use access_code::{AccessCodeGenerator, RandomSource, ThreadRandom};
pub use answer_key::{AnswerKey, KeyEntry, QuestionId};
pub use engine::VerificationEngine;
pub use error::{SessionError, ValidationError, VerificationError};
pub use outcome::{RejectionReason, RiskLevel, ScoredAnswer, VerificationOutcome};
pub use scoring::{AnswerScorer, AnswerScoring};
pub use session::SessionResolver;
pub use submission::Submission;
