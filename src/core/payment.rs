//! Wire types exchanged with the payment-initiation endpoint

use crate::core::error::ValidationError;
use crate::core::validation::{self, AmountInput};
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// Path of the payment-initiation endpoint, relative to the backend base URL
pub const INITIATE_PAYMENT_PATH: &str = "initiate-payment";

/// Body of `POST {base}/initiate-payment`
///
/// Only constructed from input that passed both field validators; the derived
/// [`Validate`] impl re-checks the same rules right before the request leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PaymentRequest {
    #[validate(custom(function = "validate_phone_field"))]
    pub phone: String,

    #[validate(range(exclusive_min = 0.0))]
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,
}

impl PaymentRequest {
    /// Build a request from raw field values, rejecting anything the validators reject
    pub fn from_fields(phone: &str, amount: &AmountInput) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let phone_check = validation::validate_phone(phone);
        if let Some(message) = phone_check.error_message {
            errors.push(crate::core::error::FieldValidationError {
                field: "phone".to_string(),
                message,
            });
        }

        let parsed = validation::parse_amount(amount);
        if parsed.is_none() {
            errors.push(crate::core::error::FieldValidationError {
                field: "amount".to_string(),
                message: validation::AMOUNT_ERROR_MESSAGE.to_string(),
            });
        }

        match (errors.is_empty(), parsed) {
            (true, Some(amount)) => Ok(Self {
                phone: phone.to_string(),
                amount,
            }),
            _ => Err(ValidationError::FieldErrors(errors)),
        }
    }

    /// Phone number with the middle digits hidden, for logs
    pub fn masked_phone(&self) -> String {
        mask_phone(&self.phone)
    }
}

fn validate_phone_field(phone: &str) -> Result<(), validator::ValidationError> {
    if validation::validate_phone(phone).valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("phone_format")
            .with_message(validation::PHONE_ERROR_MESSAGE.into()))
    }
}

/// Whole amounts go out as JSON integers (`100`), others as floats (`99.5`)
fn serialize_amount<S>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

/// Keep the `2547` prefix and the last four digits
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

/// Successful (2xx) response from the payment service
///
/// The body is not interpreted; it is kept when it parses as JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentAck {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

/// Application-level error payload returned with a non-2xx status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
