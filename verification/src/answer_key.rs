//! The fixed quiz and its reference answers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::VerificationError;
use crate::scoring::compact;

/// Points available across the whole quiz.
pub const TOTAL_POINTS: u32 = 100;

/// The six quiz questions, in the order they are scored and reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionId {
    AfterpartyHost,
    AfterpartyCount,
    ParkingInfo,
    WeatherRange,
    HotelDiscount,
    TicketTiming,
}

impl QuestionId {
    pub const ALL: [QuestionId; 6] = [
        QuestionId::AfterpartyHost,
        QuestionId::AfterpartyCount,
        QuestionId::ParkingInfo,
        QuestionId::WeatherRange,
        QuestionId::HotelDiscount,
        QuestionId::TicketTiming,
    ];

    /// Field name used in submissions.
    pub fn field_name(&self) -> &'static str {
        match self {
            QuestionId::AfterpartyHost => "afterpartyHost",
            QuestionId::AfterpartyCount => "afterpartyCount",
            QuestionId::ParkingInfo => "parkingInfo",
            QuestionId::WeatherRange => "weatherRange",
            QuestionId::HotelDiscount => "hotelDiscount",
            QuestionId::TicketTiming => "ticketTiming",
        }
    }

    /// Human-readable label used in score breakdowns.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionId::AfterpartyHost => "After party host",
            QuestionId::AfterpartyCount => "After party count",
            QuestionId::ParkingInfo => "Parking info",
            QuestionId::WeatherRange => "Weather range",
            QuestionId::HotelDiscount => "Hotel discount",
            QuestionId::TicketTiming => "Ticket timing",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEntry {
    pub question: QuestionId,
    pub answer: String,
    pub max_points: u32,
}

impl KeyEntry {
    pub fn new(question: QuestionId, answer: impl Into<String>, max_points: u32) -> Self {
        Self {
            question,
            answer: answer.into(),
            max_points,
        }
    }
}

/// Immutable mapping from question to reference answer and weight.
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerKey {
    entries: Vec<KeyEntry>,
}

impl AnswerKey {
    /// Build a key from explicit entries.
    ///
    /// Every question must appear exactly once, weights must sum to
    /// [`TOTAL_POINTS`], and no reference answer may normalise to nothing.
    pub fn new(mut entries: Vec<KeyEntry>) -> Result<Self, VerificationError> {
        entries.sort_by_key(|e| e.question);
        let questions: Vec<QuestionId> = entries.iter().map(|e| e.question).collect();
        if questions != QuestionId::ALL {
            return Err(VerificationError::InvalidAnswerKey(
                "every question must appear exactly once".to_string(),
            ));
        }

        let total = entries
            .iter()
            .try_fold(0u32, |acc, e| acc.checked_add(e.max_points))
            .ok_or_else(|| {
                VerificationError::InvalidAnswerKey(format!(
                    "weights overflow, expected {TOTAL_POINTS}"
                ))
            })?;
        if total != TOTAL_POINTS {
            return Err(VerificationError::InvalidAnswerKey(format!(
                "weights sum to {total}, expected {TOTAL_POINTS}"
            )));
        }

        if let Some(empty) = entries.iter().find(|e| compact(&e.answer).is_empty()) {
            return Err(VerificationError::InvalidAnswerKey(format!(
                "answer for {} is empty after normalisation",
                empty.question
            )));
        }

        Ok(Self { entries })
    }

    /// The key for the YC AI Startup School 2025 event.
    pub fn startup_school() -> Self {
        Self {
            entries: vec![
                KeyEntry::new(QuestionId::AfterpartyHost, "corgi", 20),
                KeyEntry::new(QuestionId::AfterpartyCount, "21", 20),
                KeyEntry::new(QuestionId::ParkingInfo, "yes", 15),
                KeyEntry::new(QuestionId::WeatherRange, "50-75", 15),
                KeyEntry::new(QuestionId::HotelDiscount, "YCAI25", 20),
                KeyEntry::new(QuestionId::TicketTiming, "1 day before", 10),
            ],
        }
    }

    /// Entries in scoring order.
    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    pub fn entry(&self, question: QuestionId) -> Option<&KeyEntry> {
        self.entries.iter().find(|e| e.question == question)
    }

    pub fn total_points(&self) -> u32 {
        self.entries.iter().map(|e| e.max_points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_school_key_is_valid() {
        let key = AnswerKey::startup_school();
        assert_eq!(AnswerKey::new(key.entries().to_vec()).unwrap(), key);
        assert_eq!(key.total_points(), 100);
        let weights: Vec<u32> = key.entries().iter().map(|e| e.max_points).collect();
        assert_eq!(weights, vec![20, 20, 15, 15, 20, 10]);
    }

    #[test]
    fn entries_are_reordered_by_question() {
        let mut entries = AnswerKey::startup_school().entries().to_vec();
        entries.reverse();
        let key = AnswerKey::new(entries).unwrap();
        assert_eq!(key.entries()[0].question, QuestionId::AfterpartyHost);
        assert_eq!(key.entries()[5].question, QuestionId::TicketTiming);
    }

    #[test]
    fn missing_question_rejected() {
        let mut entries = AnswerKey::startup_school().entries().to_vec();
        entries.pop();
        assert!(matches!(
            AnswerKey::new(entries),
            Err(VerificationError::InvalidAnswerKey(_))
        ));
    }

    #[test]
    fn repeated_question_rejected() {
        let mut entries = AnswerKey::startup_school().entries().to_vec();
        entries[5] = KeyEntry::new(QuestionId::AfterpartyHost, "corgi", 10);
        assert!(AnswerKey::new(entries).is_err());
    }

    #[test]
    fn weights_must_total_one_hundred() {
        let mut entries = AnswerKey::startup_school().entries().to_vec();
        entries[0].max_points = 21;
        let err = AnswerKey::new(entries).unwrap_err();
        assert!(err.to_string().contains("101"));
    }

    #[test]
    fn oversized_weight_rejected_without_wrapping() {
        // Wraps to exactly 100 under unchecked u32 addition.
        let mut entries = AnswerKey::startup_school().entries().to_vec();
        let weights = [u32::MAX, 21, 20, 20, 20, 20];
        for (entry, w) in entries.iter_mut().zip(weights) {
            entry.max_points = w;
        }
        let err = AnswerKey::new(entries).unwrap_err();
        assert!(matches!(err, VerificationError::InvalidAnswerKey(_)));
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn blank_reference_answer_rejected() {
        let mut entries = AnswerKey::startup_school().entries().to_vec();
        entries[2].answer = " ?! ".into();
        assert!(AnswerKey::new(entries).is_err());
    }

    #[test]
    fn question_ids_serialize_as_field_names() {
        for q in QuestionId::ALL {
            let json = serde_json::to_string(&q).unwrap();
            assert_eq!(json, format!("\"{}\"", q.field_name()));
        }
    }
}
