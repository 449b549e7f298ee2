//! View model derived from [`FormState`]
//!
//! Everything a renderer needs to draw the form without re-deriving rules from state.

use super::state::{FormPhase, FormState};
use serde::Serialize;

pub const PHONE_PLACEHOLDER: &str = "2547XXXXXXXX";
pub const AMOUNT_PLACEHOLDER: &str = "100";
pub const AMOUNT_MIN: u32 = 1;
pub const SUBMIT_LABEL: &str = "Pay with M-Pesa";
pub const SUBMITTING_LABEL: &str = "Processing...";

/// Colour family of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Error,
}

/// Renderable snapshot of a form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub phone: String,
    pub amount: String,
    pub phone_error: Option<String>,
    pub amount_error: Option<String>,
    pub phone_placeholder: &'static str,
    pub amount_placeholder: &'static str,
    /// Lower bound hint for a numeric amount input
    pub amount_min: u32,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub status: Option<(String, StatusTone)>,
}

impl From<&FormState> for FormView {
    fn from(state: &FormState) -> Self {
        let submit_label = if state.phase == FormPhase::Submitting {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        };

        let status = state.result_message.as_ref().map(|message| {
            let tone = if state.result_is_success {
                StatusTone::Success
            } else {
                StatusTone::Error
            };
            (message.clone(), tone)
        });

        Self {
            phone: state.phone.clone(),
            amount: state.amount.to_string(),
            phone_error: state.phone_error.clone(),
            amount_error: state.amount_error.clone(),
            phone_placeholder: PHONE_PLACEHOLDER,
            amount_placeholder: AMOUNT_PLACEHOLDER,
            amount_min: AMOUNT_MIN,
            submit_label,
            submit_enabled: state.can_submit(),
            status,
        }
    }
}
