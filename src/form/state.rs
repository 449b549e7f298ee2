//! Form state owned by one [`PaymentForm`](super::PaymentForm)

use crate::core::validation::AmountInput;
use serde::{Deserialize, Serialize};

/// Result line shown after a successful initiation
pub const SUCCESS_MESSAGE: &str =
    "✅ Payment initiated successfully. Check your phone to complete the payment.";

/// Leading marker of every success message
pub const SUCCESS_MARKER: &str = "✅";

/// Leading marker of every failure message
pub const FAILURE_MARKER: &str = "❌";

/// Failure messages are this prefix followed by the detail
pub const FAILURE_PREFIX: &str = "❌ Error: ";

/// Detail used when the service gave no error string (or no response at all)
pub const UNREACHABLE_DETAIL: &str = "Server is unreachable";

/// Where the form is in its submit lifecycle
///
/// `Validating` is entered and left inside a single call, so snapshots never show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Invalid,
    Submitting,
    Success,
    Failed,
}

/// Field values, error slots and result line of one form instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormState {
    pub phone: String,
    pub amount: AmountInput,
    pub submitting: bool,
    pub result_message: Option<String>,
    pub result_is_success: bool,
    pub phone_error: Option<String>,
    pub amount_error: Option<String>,
    pub phase: FormPhase,
}

impl FormState {
    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        self.phone_error.is_none() && self.amount_error.is_none() && !self.submitting
    }

    /// Whether either error slot is set
    pub fn has_field_errors(&self) -> bool {
        self.phone_error.is_some() || self.amount_error.is_some()
    }
}

/// Failure line for a given detail string
pub fn failure_message(detail: &str) -> String {
    format!("{}{}", FAILURE_PREFIX, detail)
}
