use std::fmt;

use rust_decimal::Decimal;

use crate::rate_record::{NewRate, RateCandidate, RateRecord};

pub const DATE_FIELD: &str = "Date";
pub const RATE_FIELD: &str = "Rate";

pub const INVALID_DATE: &str = "Must be a valid date.";
pub const DUPLICATE_DATE: &str = "There already exists a rate for that date. That rate must be updated or removed instead of adding a new rate.";
pub const EMPTY_RATE: &str = "'Rate' must not be empty.";

const MIN_RATE: Decimal = Decimal::ZERO;
const MAX_RATE: Decimal = Decimal::ONE_HUNDRED;

/// A business rule violation on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a candidate against the other stored rates.
///
/// `others` must not contain the record being edited, otherwise keeping its
/// own date would collide with itself. Each field stops at its first failed
/// rule; the rate is checked whatever happened to the date.
pub fn validate(candidate: &RateCandidate, others: &[RateRecord]) -> Result<NewRate, Vec<FieldError>> {
    let mut errors = Vec::new();

    let date = match candidate.date {
        None => {
            errors.push(FieldError::new(DATE_FIELD, INVALID_DATE));
            None
        }
        Some(date) if others.iter().any(|r| r.date == date) => {
            errors.push(FieldError::new(DATE_FIELD, DUPLICATE_DATE));
            None
        }
        Some(date) => Some(date),
    };

    let rate = match candidate.rate {
        None => {
            errors.push(FieldError::new(RATE_FIELD, EMPTY_RATE));
            None
        }
        Some(rate) if rate < MIN_RATE || rate > MAX_RATE => {
            errors.push(FieldError::new(
                RATE_FIELD,
                format!("'Rate' must be between {MIN_RATE} and {MAX_RATE}. You entered {rate}."),
            ));
            None
        }
        Some(rate) => Some(rate),
    };

    match (date, rate) {
        (Some(date), Some(rate)) => Ok(NewRate { date, rate }),
        _ => Err(errors),
    }
}
