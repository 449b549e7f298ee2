//! Phone and amount validators

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Shown next to the phone field when it does not match `2547XXXXXXXX`
pub const PHONE_ERROR_MESSAGE: &str = "❌ Enter a valid Kenyan phone number (2547XXXXXXXX)";

/// Shown next to the amount field when it is not a positive number
pub const AMOUNT_ERROR_MESSAGE: &str = "❌ Amount must be greater than zero.";

// ASCII class on purpose: `\d` would also accept non-Latin digits.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^2547[0-9]{8}$").expect("phone pattern is valid"));

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error_message: Some(message.into()),
        }
    }
}

/// Raw content of the amount field
///
/// Front-ends hand over either the text of a number input or an already numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl Default for AmountInput {
    fn default() -> Self {
        AmountInput::Text(String::new())
    }
}

impl fmt::Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountInput::Number(n) => write!(f, "{}", n),
            AmountInput::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        AmountInput::Number(value as f64)
    }
}

impl From<u32> for AmountInput {
    fn from(value: u32) -> Self {
        AmountInput::Number(f64::from(value))
    }
}

/// Validate a phone number: `2547` followed by exactly eight digits, nothing else
pub fn validate_phone(raw: &str) -> ValidationResult {
    if PHONE_REGEX.is_match(raw) {
        ValidationResult::ok()
    } else {
        ValidationResult::invalid(PHONE_ERROR_MESSAGE)
    }
}

/// Numeric value of the amount field, if it is a finite number greater than zero
pub fn parse_amount(raw: &AmountInput) -> Option<f64> {
    let value = match raw {
        AmountInput::Number(n) => *n,
        AmountInput::Text(s) => s.trim().parse::<f64>().ok()?,
    };

    (value.is_finite() && value > 0.0).then_some(value)
}

/// Validate an amount: must parse as a number strictly greater than zero
///
/// Empty and non-numeric text are rejected.
pub fn validate_amount(raw: &AmountInput) -> ValidationResult {
    match parse_amount(raw) {
        Some(_) => ValidationResult::ok(),
        None => ValidationResult::invalid(AMOUNT_ERROR_MESSAGE),
    }
}
