//! The verification form.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::answer_key::QuestionId;
use crate::error::ValidationError;

const PROFILE_URL_PATTERN: &str = r"^https?://(www\.)?linkedin\.com/in/[^/\s]+/?$";

/// Path fragments that mark a company, school or legacy public page rather
/// than a personal profile.
const NON_PERSONAL_SEGMENTS: [&str; 3] = ["/company/", "/school/", "/pub/"];

/// Six free-text answers plus the two identity fields.
///
/// Missing JSON fields deserialize as empty strings so that validation, not
/// parsing, reports them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Submission {
    pub afterparty_host: String,
    pub afterparty_count: String,
    pub parking_info: String,
    pub weather_range: String,
    pub hotel_discount: String,
    pub ticket_timing: String,
    pub email: String,
    /// Professional profile URL, original case preserved.
    #[serde(rename = "linkedinUrl")]
    pub identity_url: String,
}

impl Submission {
    pub fn answer(&self, question: QuestionId) -> &str {
        match question {
            QuestionId::AfterpartyHost => &self.afterparty_host,
            QuestionId::AfterpartyCount => &self.afterparty_count,
            QuestionId::ParkingInfo => &self.parking_info,
            QuestionId::WeatherRange => &self.weather_range,
            QuestionId::HotelDiscount => &self.hotel_discount,
            QuestionId::TicketTiming => &self.ticket_timing,
        }
    }

    /// Check the form rules, returning the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for question in QuestionId::ALL {
            let (min, message) = answer_rule(question);
            if self.answer(question).chars().count() < min {
                return Err(ValidationError {
                    field: question.field_name(),
                    message,
                });
            }
        }

        if !is_valid_email(&self.email) {
            return Err(ValidationError {
                field: "email",
                message: "Please enter a valid email address",
            });
        }

        if !profile_url_regex().is_some_and(|re| re.is_match(&self.identity_url)) {
            return Err(ValidationError {
                field: "linkedinUrl",
                message: "Please enter a valid LinkedIn profile URL",
            });
        }
        if NON_PERSONAL_SEGMENTS
            .iter()
            .any(|seg| self.identity_url.contains(seg))
        {
            return Err(ValidationError {
                field: "linkedinUrl",
                message: "Please provide a valid personal LinkedIn profile URL",
            });
        }

        Ok(())
    }
}

fn answer_rule(question: QuestionId) -> (usize, &'static str) {
    match question {
        QuestionId::AfterpartyHost => (2, "Please provide the host name"),
        QuestionId::AfterpartyCount => (1, "Please provide the number of after parties"),
        QuestionId::ParkingInfo => (2, "Please answer Yes or No"),
        QuestionId::WeatherRange => (5, "Please provide the temperature range mentioned"),
        QuestionId::HotelDiscount => (3, "Please provide the discount code"),
        QuestionId::TicketTiming => (5, "Please provide when tickets are distributed"),
    }
}

fn profile_url_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PROFILE_URL_PATTERN).ok()).as_ref()
}

/// `local@domain.tld` with no whitespace and no empty domain labels.
pub fn is_valid_email(raw: &str) -> bool {
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
