//! Field validation
//!
//! Pure functions mapping raw form input to a [`ValidationResult`]. They are run on every
//! field change and once more right before a submission.

pub mod validators;

pub use validators::{
    AMOUNT_ERROR_MESSAGE, AmountInput, PHONE_ERROR_MESSAGE, ValidationResult, parse_amount,
    validate_amount, validate_phone,
};
